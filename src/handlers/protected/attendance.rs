// handlers/protected/attendance.rs - /api/attendance handlers

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{parse_date_param, AttendanceStatus, NewAttendance};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, Params, Payload};
use crate::services::attendance_service::report_range;
use crate::services::{AttendanceService, MarkEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    pub student_id: Option<i32>,
    pub date: Option<String>,
    pub status: Option<AttendanceStatus>,
}

impl RecordAttendanceRequest {
    pub fn validate(self) -> Result<NewAttendance, ApiError> {
        let (Some(student_id), Some(date), Some(status)) = (self.student_id, required(self.date), self.status) else {
            return Err(ApiError::bad_request("studentId, date and status are required"));
        };
        let date = parse_date_param(&date).ok_or_else(|| ApiError::bad_request("Invalid date"))?;

        Ok(NewAttendance { student_id, date, status })
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub attendance: Option<Vec<MarkEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub division_id: Option<i32>,
}

/// POST /api/attendance - record a single entry
pub async fn record(
    State(state): State<AppState>,
    Payload(request): Payload<RecordAttendanceRequest>,
) -> ApiResult<Value> {
    let new_record = request.validate()?;

    let record = state.store.create_attendance(new_record).await?;
    Ok(ApiResponse::success(json!({ "attendance": record })).message("Attendance recorded successfully"))
}

/// POST /api/attendance/mark - record today's attendance for many students at once
pub async fn mark(
    State(state): State<AppState>,
    Payload(request): Payload<MarkAttendanceRequest>,
) -> ApiResult<Value> {
    let entries = request
        .attendance
        .ok_or_else(|| ApiError::bad_request("attendance must be an array"))?;

    let records = AttendanceService::new(state.store.clone())
        .mark(&entries, Utc::now())
        .await?;

    Ok(ApiResponse::success(json!({ "attendanceRecords": records })).message("Attendance marked successfully"))
}

/// GET /api/attendance/report?startDate&endDate&divisionId - per-student tallies
pub async fn report(State(state): State<AppState>, Params(query): Params<ReportQuery>) -> ApiResult<Value> {
    let (Some(start), Some(division_id)) = (required(query.start_date), query.division_id) else {
        return Err(ApiError::bad_request("startDate and divisionId are required"));
    };
    let end = required(query.end_date);

    let range = report_range(&start, end.as_deref()).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let report = AttendanceService::new(state.store.clone())
        .report(division_id, range)
        .await?;

    Ok(ApiResponse::success(json!({ "report": report })))
}
