use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::division::Division;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub roll_number: Option<i32>,
    pub division_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: Option<i32>,
    pub division_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentWithDivision {
    #[serde(flatten)]
    pub student: Student,
    pub division: Division,
}
