// handlers/protected/students.rs - /api/students handlers

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::database::models::{parse_date_param, NewStudent, Student, StudentWithDivision};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, IdPath, Params, Payload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub division_id: Option<i32>,
    pub roll_number: Option<i32>,
}

impl CreateStudentRequest {
    pub fn validate(self) -> Result<NewStudent, ApiError> {
        match (required(self.name), self.division_id) {
            (Some(name), Some(division_id)) => Ok(NewStudent {
                name,
                roll_number: self.roll_number,
                division_id,
            }),
            _ => Err(ApiError::bad_request("Name and divisionId are required")),
        }
    }
}

/// Update replaces every field, so all three must be present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub roll_number: Option<i32>,
    pub division_id: Option<i32>,
}

impl UpdateStudentRequest {
    pub fn validate(self) -> Result<NewStudent, ApiError> {
        match (required(self.name), self.roll_number, self.division_id) {
            (Some(name), Some(roll_number), Some(division_id)) => Ok(NewStudent {
                name,
                roll_number: Some(roll_number),
                division_id,
            }),
            _ => Err(ApiError::bad_request("Name, rollNumber and divisionId are required")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    pub division_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistoryRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

async fn with_division(state: &AppState, student: Student) -> Result<StudentWithDivision, ApiError> {
    let division = state
        .store
        .find_division(student.division_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Division not found"))?;
    Ok(StudentWithDivision { student, division })
}

async fn require_division(state: &AppState, division_id: i32) -> Result<(), ApiError> {
    match state.store.find_division(division_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Division not found")),
    }
}

/// POST /api/students - enroll a student in a division
pub async fn create(
    State(state): State<AppState>,
    Payload(request): Payload<CreateStudentRequest>,
) -> ApiResult<Value> {
    let new_student = request.validate()?;
    require_division(&state, new_student.division_id).await?;

    let student = state.store.create_student(new_student).await?;
    info!("Added student {} ({}) to division {}", student.name, student.id, student.division_id);

    Ok(ApiResponse::created(json!({ "student": student })).message("Student added successfully"))
}

/// GET /api/students?divisionId= - students of one division
pub async fn list(State(state): State<AppState>, Params(query): Params<StudentQuery>) -> ApiResult<Value> {
    let division_id = query
        .division_id
        .ok_or_else(|| ApiError::bad_request("divisionId is required"))?;

    let students = state.store.list_students(division_id).await?;
    Ok(ApiResponse::success(json!({ "students": students })))
}

/// GET /api/students/:id - student with its division
pub async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Value> {
    let student = state
        .store
        .find_student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let student = with_division(&state, student).await?;
    Ok(ApiResponse::success(json!({ "student": student })))
}

/// PUT /api/students/:id - replace name, roll number and division
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Payload(request): Payload<UpdateStudentRequest>,
) -> ApiResult<Value> {
    let changes = request.validate()?;
    require_division(&state, changes.division_id).await?;

    let student = state
        .store
        .update_student(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let student = with_division(&state, student).await?;
    Ok(ApiResponse::success(json!({ "student": student })).message("Student updated successfully"))
}

/// DELETE /api/students/:id
pub async fn remove(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Value> {
    if !state.store.delete_student(id).await? {
        return Err(ApiError::not_found("Student not found"));
    }

    info!("Removed student {}", id);
    Ok(ApiResponse::ok("Student removed successfully"))
}

/// POST /api/students/:id/attendance - attendance history between two dates (inclusive)
pub async fn attendance(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Payload(request): Payload<AttendanceHistoryRequest>,
) -> ApiResult<Value> {
    let (Some(start), Some(end)) = (required(request.start_date), required(request.end_date)) else {
        return Err(ApiError::bad_request("startDate and endDate are required"));
    };
    let from = parse_date_param(&start).ok_or_else(|| ApiError::bad_request("Invalid startDate"))?;
    let to = parse_date_param(&end).ok_or_else(|| ApiError::bad_request("Invalid endDate"))?;

    if state.store.find_student(id).await?.is_none() {
        return Err(ApiError::not_found("Student not found"));
    }

    let records = state.store.student_attendance(id, from, to).await?;
    Ok(ApiResponse::success(json!({ "attendance": records })))
}
