use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::division::Division;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: i32,
    pub username: String,
    /// bcrypt hash; never leaves the server
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    pub department: String,
    #[serde(rename = "isHOD")]
    pub is_hod: bool,
}

#[derive(Debug, Clone)]
pub struct NewProfessor {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub department: String,
    pub is_hod: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorWithDivisions {
    #[serde(flatten)]
    pub professor: Professor,
    pub divisions: Vec<Division>,
}
