// handlers/protected/dashboard.rs - GET /api/dashboard handler

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Params};
use crate::services::DivisionService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub professor_id: Option<i32>,
}

/// GET /api/dashboard?professorId= - one summary row per division the professor teaches
///
/// With authentication on, a missing `professorId` means the caller.
pub async fn summary(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Params(query): Params<DashboardQuery>,
) -> ApiResult<Value> {
    let professor_id = query
        .professor_id
        .or(user.map(|Extension(user)| user.id))
        .ok_or_else(|| ApiError::bad_request("professorId is required"))?;

    let divisions = DivisionService::new(state.store.clone())
        .dashboard(professor_id)
        .await?;

    Ok(ApiResponse::success(json!({ "divisions": divisions })))
}
