use std::sync::Arc;

use futures::future::try_join_all;

use crate::database::models::{
    DateRange, Division, DivisionDetail, DivisionSummary, DivisionWithStudents,
};
use crate::database::{Store, StoreError, StoreResult};

/// Today's records divided by the division's student count; 0.0 for an empty
/// division.
pub fn average_attendance(records_today: i64, student_count: usize) -> f64 {
    if student_count == 0 {
        return 0.0;
    }
    records_today as f64 / student_count as f64
}

pub struct DivisionService {
    store: Arc<dyn Store>,
}

impl DivisionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn with_students(&self, division: Division) -> StoreResult<DivisionWithStudents> {
        let students = self.store.list_students(division.id).await?;
        Ok(DivisionWithStudents { division, students })
    }

    pub async fn all_with_students(&self) -> StoreResult<Vec<DivisionWithStudents>> {
        let divisions = self.store.list_divisions().await?;
        try_join_all(divisions.into_iter().map(|d| self.with_students(d))).await
    }

    pub async fn detail(&self, division_id: i32) -> StoreResult<Option<DivisionDetail>> {
        let Some(division) = self.store.find_division(division_id).await? else {
            return Ok(None);
        };

        let (students, professors, records_today) = tokio::try_join!(
            self.store.list_students(division_id),
            self.store.division_professors(division_id),
            self.store.count_division_attendance(division_id, DateRange::today()),
        )?;

        let avg_attendance = average_attendance(records_today, students.len());
        Ok(Some(DivisionDetail {
            division,
            students,
            professors,
            avg_attendance,
        }))
    }

    /// Per-division student counts and whether attendance was taken today,
    /// for every division the professor teaches.
    pub async fn dashboard(&self, professor_id: i32) -> StoreResult<Vec<DivisionSummary>> {
        let divisions = self.store.professor_divisions(professor_id).await?;
        let today = DateRange::today();

        try_join_all(divisions.into_iter().map(|division| async move {
            let (students, records_today) = tokio::try_join!(
                self.store.list_students(division.id),
                self.store.count_division_attendance(division.id, today),
            )?;
            Ok::<_, StoreError>(DivisionSummary {
                id: division.id,
                name: division.name,
                student_count: students.len(),
                attendance_taken: records_today > 0,
            })
        }))
        .await
    }
}
