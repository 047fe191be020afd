// handlers/protected/divisions.rs - /api/divisions handlers

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, IdPath, Params, Payload};
use crate::services::DivisionService;

#[derive(Debug, Deserialize)]
pub struct DivisionQuery {
    pub id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDivisionRequest {
    pub name: Option<String>,
}

/// GET /api/divisions - every division with its students, or one with `?id=`
pub async fn list(State(state): State<AppState>, Params(query): Params<DivisionQuery>) -> ApiResult<Value> {
    let service = DivisionService::new(state.store.clone());

    if let Some(id) = query.id {
        let division = state
            .store
            .find_division(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Division not found"))?;
        let division = service.with_students(division).await?;
        return Ok(ApiResponse::success(json!({ "division": division })));
    }

    let divisions = service.all_with_students().await?;
    Ok(ApiResponse::success(json!({ "divisions": divisions })))
}

/// POST /api/divisions - create a division
pub async fn create(
    State(state): State<AppState>,
    Payload(request): Payload<CreateDivisionRequest>,
) -> ApiResult<Value> {
    let name = required(request.name).ok_or_else(|| ApiError::bad_request("Division name is required"))?;

    let division = state.store.create_division(&name).await?;
    info!("Created division {} ({})", division.name, division.id);

    Ok(ApiResponse::created(json!({ "division": division })).message("Division created successfully"))
}

/// GET /api/divisions/:id - division with students, professors and today's average
pub async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Value> {
    let detail = DivisionService::new(state.store.clone())
        .detail(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Division not found"))?;

    Ok(ApiResponse::success(json!({ "division": detail })))
}
