use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::professor::Professor;
use super::student::Student;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Division {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionWithStudents {
    #[serde(flatten)]
    pub division: Division,
    pub students: Vec<Student>,
}

/// Division detail view, including today's average attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDetail {
    #[serde(flatten)]
    pub division: Division,
    pub students: Vec<Student>,
    pub professors: Vec<Professor>,
    pub avg_attendance: f64,
}

/// One row of the professor dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionSummary {
    pub id: i32,
    pub name: String,
    pub student_count: usize,
    pub attendance_taken: bool,
}
