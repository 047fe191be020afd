use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use tracing::info;

use super::error::{StoreError, StoreResult};
use super::models::{
    Attendance, AttendanceTally, DateRange, Division, NewAttendance, NewProfessor, NewStudent,
    Professor, Student,
};
use super::store::Store;

const PROFESSOR_COLUMNS: &str = "p.id, p.username, p.password, p.name, p.department, p.is_hod";
const STUDENT_COLUMNS: &str = "id, name, roll_number, division_id";
const ATTENDANCE_COLUMNS: &str = "id, date, status, student_id";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

fn constraint_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    match err {
        sqlx::Error::Database(db_err) => Some(db_err.kind()),
        _ => None,
    }
}

/// Turns unique / foreign-key violations into domain errors, passing
/// everything else through as `Sqlx`.
fn map_constraint(
    err: sqlx::Error,
    on_unique: impl FnOnce() -> StoreError,
    on_foreign_key: impl FnOnce() -> StoreError,
) -> StoreError {
    match constraint_kind(&err) {
        Some(ErrorKind::UniqueViolation) => on_unique(),
        Some(ErrorKind::ForeignKeyViolation) => on_foreign_key(),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_professor(&self, id: i32) -> StoreResult<Option<Professor>> {
        let sql = format!("SELECT {PROFESSOR_COLUMNS} FROM professors p WHERE p.id = $1");
        let professor = sqlx::query_as::<_, Professor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(professor)
    }

    async fn find_professor_by_username(&self, username: &str) -> StoreResult<Option<Professor>> {
        let sql = format!("SELECT {PROFESSOR_COLUMNS} FROM professors p WHERE p.username = $1");
        let professor = sqlx::query_as::<_, Professor>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(professor)
    }

    async fn create_professor(
        &self,
        professor: NewProfessor,
        division_ids: &[i32],
    ) -> StoreResult<Professor> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Professor>(
            "INSERT INTO professors (username, password, name, department, is_hod)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, password, name, department, is_hod",
        )
        .bind(&professor.username)
        .bind(&professor.password_hash)
        .bind(&professor.name)
        .bind(&professor.department)
        .bind(professor.is_hod)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_constraint(
                e,
                || StoreError::conflict("Username already exists"),
                || StoreError::conflict("Professor could not be created"),
            )
        })?;

        for &division_id in division_ids {
            sqlx::query(
                "INSERT INTO professor_divisions (professor_id, division_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(created.id)
            .bind(division_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Division already assigned"),
                    || StoreError::not_found(format!("Division {} not found", division_id)),
                )
            })?;
        }

        tx.commit().await?;
        info!("Registered professor {} ({})", created.username, created.id);
        Ok(created)
    }

    async fn professor_divisions(&self, professor_id: i32) -> StoreResult<Vec<Division>> {
        let divisions = sqlx::query_as::<_, Division>(
            "SELECT d.id, d.name
             FROM divisions d
             JOIN professor_divisions pd ON pd.division_id = d.id
             WHERE pd.professor_id = $1
             ORDER BY d.id",
        )
        .bind(professor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(divisions)
    }

    async fn assign_divisions(&self, professor_id: i32, division_ids: &[i32]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for &division_id in division_ids {
            sqlx::query(
                "INSERT INTO professor_divisions (professor_id, division_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(professor_id)
            .bind(division_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Division already assigned"),
                    || StoreError::not_found(format!("Division {} not found", division_id)),
                )
            })?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_division(&self, name: &str) -> StoreResult<Division> {
        let division = sqlx::query_as::<_, Division>(
            "INSERT INTO divisions (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(division)
    }

    async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        let divisions = sqlx::query_as::<_, Division>("SELECT id, name FROM divisions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(divisions)
    }

    async fn find_division(&self, id: i32) -> StoreResult<Option<Division>> {
        let division = sqlx::query_as::<_, Division>("SELECT id, name FROM divisions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(division)
    }

    async fn division_professors(&self, division_id: i32) -> StoreResult<Vec<Professor>> {
        let sql = format!(
            "SELECT {PROFESSOR_COLUMNS}
             FROM professors p
             JOIN professor_divisions pd ON pd.professor_id = p.id
             WHERE pd.division_id = $1
             ORDER BY p.id"
        );
        let professors = sqlx::query_as::<_, Professor>(&sql)
            .bind(division_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(professors)
    }

    async fn create_student(&self, student: NewStudent) -> StoreResult<Student> {
        let sql = format!(
            "INSERT INTO students (name, roll_number, division_id)
             VALUES ($1, $2, $3)
             RETURNING {STUDENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Student>(&sql)
            .bind(&student.name)
            .bind(student.roll_number)
            .bind(student.division_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Student already exists"),
                    || StoreError::not_found("Division not found"),
                )
            })?;
        Ok(created)
    }

    async fn list_students(&self, division_id: i32) -> StoreResult<Vec<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE division_id = $1 ORDER BY id");
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(division_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn update_student(&self, id: i32, student: NewStudent) -> StoreResult<Option<Student>> {
        let sql = format!(
            "UPDATE students SET name = $2, roll_number = $3, division_id = $4
             WHERE id = $1
             RETURNING {STUDENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(&student.name)
            .bind(student.roll_number)
            .bind(student.division_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Student already exists"),
                    || StoreError::not_found("Division not found"),
                )
            })?;
        Ok(updated)
    }

    async fn delete_student(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Student could not be removed"),
                    || StoreError::conflict("Student has attendance records"),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_attendance(&self, record: NewAttendance) -> StoreResult<Attendance> {
        let sql = format!(
            "INSERT INTO attendance (date, status, student_id)
             VALUES ($1, $2, $3)
             RETURNING {ATTENDANCE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Attendance>(&sql)
            .bind(record.date)
            .bind(record.status)
            .bind(record.student_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint(
                    e,
                    || StoreError::conflict("Attendance already recorded"),
                    || StoreError::not_found(format!("Student {} not found", record.student_id)),
                )
            })?;
        Ok(created)
    }

    async fn student_attendance(
        &self,
        student_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Attendance>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS}
             FROM attendance
             WHERE student_id = $1 AND date >= $2 AND date <= $3
             ORDER BY date ASC, id ASC"
        );
        let records = sqlx::query_as::<_, Attendance>(&sql)
            .bind(student_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn count_division_attendance(&self, division_id: i32, range: DateRange) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM attendance a
             JOIN students s ON s.id = a.student_id
             WHERE s.division_id = $1 AND a.date >= $2 AND a.date < $3",
        )
        .bind(division_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn attendance_tallies(
        &self,
        division_id: i32,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceTally>> {
        let tallies = sqlx::query_as::<_, AttendanceTally>(
            "SELECT s.id AS student_id,
                    s.name AS student_name,
                    COUNT(*) FILTER (WHERE a.status = 'Present') AS present,
                    COUNT(*) FILTER (WHERE a.status = 'Absent') AS absent
             FROM attendance a
             JOIN students s ON s.id = a.student_id
             WHERE s.division_id = $1 AND a.date >= $2 AND a.date < $3
             GROUP BY s.id, s.name
             ORDER BY s.id",
        )
        .bind(division_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(tallies)
    }
}
