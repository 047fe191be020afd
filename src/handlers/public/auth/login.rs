// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, Payload};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(username, password)` when both are present and non-empty.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        match (required(self.username), required(self.password)) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(ApiError::bad_request("Username and password are required")),
        }
    }
}

/**
 * POST /api/auth/login - Authenticate a professor and receive a JWT
 *
 * Input: `{ "username": "string", "password": "string" }`
 *
 * Output:
 * ```json
 * { "success": true, "message": "Login successful", "token": "eyJ...", "id": 1, "isHOD": false }
 * ```
 *
 * An unknown username and a wrong password both produce the same 401.
 */
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> ApiResult<Value> {
    let (username, password) = request.validate()?;

    let Some(professor) = state.store.find_professor_by_username(&username).await? else {
        warn!("Login attempt for unknown username '{}'", username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&password, &professor.password).await? {
        warn!("Login attempt with wrong password for '{}'", username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let security = &state.config.security;
    let claims = Claims::new(professor.id, &professor.username, security.jwt_expiry_minutes);
    let token = generate_jwt(&claims, security)?;

    info!("Professor {} ({}) logged in", professor.username, professor.id);

    Ok(ApiResponse::success(json!({
        "token": token,
        "id": professor.id,
        "isHOD": professor.is_hod,
    }))
    .message("Login successful"))
}
