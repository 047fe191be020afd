//! Storage seam for the API layer.
//!
//! Handlers only ever talk to a `dyn Store`. `PgStore` is the production
//! implementation; `MemoryStore` backs tests and local runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StoreResult;
use super::models::{
    Attendance, AttendanceTally, DateRange, Division, NewAttendance, NewProfessor, NewStudent,
    Professor, Student,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by `/health`.
    async fn health_check(&self) -> StoreResult<()>;

    async fn find_professor(&self, id: i32) -> StoreResult<Option<Professor>>;

    async fn find_professor_by_username(&self, username: &str) -> StoreResult<Option<Professor>>;

    /// Creates the professor and links `division_ids` as one unit.
    ///
    /// Fails with `Conflict` on a taken username and `NotFound` when a
    /// division does not exist; nothing is persisted in either case.
    async fn create_professor(
        &self,
        professor: NewProfessor,
        division_ids: &[i32],
    ) -> StoreResult<Professor>;

    async fn professor_divisions(&self, professor_id: i32) -> StoreResult<Vec<Division>>;

    /// Adds associations; ones that already exist are left alone.
    async fn assign_divisions(&self, professor_id: i32, division_ids: &[i32]) -> StoreResult<()>;

    async fn create_division(&self, name: &str) -> StoreResult<Division>;

    async fn list_divisions(&self) -> StoreResult<Vec<Division>>;

    async fn find_division(&self, id: i32) -> StoreResult<Option<Division>>;

    async fn division_professors(&self, division_id: i32) -> StoreResult<Vec<Professor>>;

    async fn create_student(&self, student: NewStudent) -> StoreResult<Student>;

    async fn list_students(&self, division_id: i32) -> StoreResult<Vec<Student>>;

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>>;

    async fn update_student(&self, id: i32, student: NewStudent) -> StoreResult<Option<Student>>;

    /// Returns `false` when no such student exists. Students with attendance
    /// records are refused with `Conflict`.
    async fn delete_student(&self, id: i32) -> StoreResult<bool>;

    async fn create_attendance(&self, record: NewAttendance) -> StoreResult<Attendance>;

    /// Records with `from <= date <= to`, oldest first.
    async fn student_attendance(
        &self,
        student_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Attendance>>;

    /// Number of records in `range` belonging to students of the division.
    async fn count_division_attendance(&self, division_id: i32, range: DateRange) -> StoreResult<i64>;

    /// One tally per student of the division with at least one record in
    /// `range`, ordered by student id.
    async fn attendance_tallies(
        &self,
        division_id: i32,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceTally>>;
}
