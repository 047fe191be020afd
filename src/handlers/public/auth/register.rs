// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::NewProfessor;
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult, Payload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "isHOD")]
    pub is_hod: Option<bool>,
    #[serde(default)]
    pub division_ids: Vec<i32>,
}

/// A register request that passed validation; the password is still plaintext.
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub department: String,
    pub is_hod: bool,
    pub division_ids: Vec<i32>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        let (Some(username), Some(password)) = (required(self.username), required(self.password)) else {
            return Err(ApiError::bad_request("Username and password are required"));
        };

        Ok(Registration {
            username,
            password,
            name: self.name.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            is_hod: self.is_hod.unwrap_or(false),
            division_ids: self.division_ids,
        })
    }
}

/**
 * POST /api/auth/register - Create a professor account
 *
 * Input:
 * ```json
 * { "username": "ada", "password": "...", "name": "Ada", "department": "CS",
 *   "isHOD": false, "divisionIds": [1, 2] }
 * ```
 *
 * Returns 201 with the new professor (without the password hash). A taken
 * username is a 409 and an unknown division a 404; neither leaves a record.
 */
pub async fn register(
    State(state): State<AppState>,
    Payload(request): Payload<RegisterRequest>,
) -> ApiResult<Value> {
    let registration = request.validate()?;

    if state
        .store
        .find_professor_by_username(&registration.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Username already exists"));
    }

    let password_hash = hash_password(&registration.password, state.config.security.bcrypt_cost).await?;

    let professor = state
        .store
        .create_professor(
            NewProfessor {
                username: registration.username,
                password_hash,
                name: registration.name,
                department: registration.department,
                is_hod: registration.is_hod,
            },
            &registration.division_ids,
        )
        .await?;

    info!(
        "Registered professor {} ({}) with {} division(s)",
        professor.username,
        professor.id,
        registration.division_ids.len()
    );

    Ok(ApiResponse::created(json!({ "professor": professor }))
        .message("Professor registered successfully"))
}
