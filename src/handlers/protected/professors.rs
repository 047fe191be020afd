// handlers/protected/professors.rs - /api/professors handlers

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::database::models::ProfessorWithDivisions;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, IdPath, Payload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDivisionsRequest {
    pub professor_id: Option<i32>,
    pub division_ids: Option<Vec<i32>>,
}

/// GET|POST /api/professors/:id - professor with assigned divisions
pub async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Value> {
    let professor = state
        .store
        .find_professor(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Professor not found"))?;
    let divisions = state.store.professor_divisions(id).await?;
    let professor = ProfessorWithDivisions { professor, divisions };

    Ok(ApiResponse::success(json!({ "professor": professor })))
}

/// POST /api/professors/updateDivisions - add division assignments, keeping existing ones
pub async fn update_divisions(
    State(state): State<AppState>,
    Payload(request): Payload<UpdateDivisionsRequest>,
) -> ApiResult<Value> {
    let (Some(professor_id), Some(division_ids)) = (request.professor_id, request.division_ids) else {
        return Err(ApiError::bad_request("Invalid request data"));
    };

    if state.store.find_professor(professor_id).await?.is_none() {
        return Err(ApiError::not_found("Professor not found"));
    }

    state.store.assign_divisions(professor_id, &division_ids).await?;
    info!("Assigned {} division(s) to professor {}", division_ids.len(), professor_id);

    Ok(ApiResponse::ok("Divisions updated successfully"))
}
