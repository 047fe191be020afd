use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::database::models::{
    parse_date_param, Attendance, AttendanceStatus, AttendanceTally, DateRange, NewAttendance,
};
use crate::database::{Store, StoreResult};

/// One entry of a bulk mark request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    pub student_id: i32,
    pub status: AttendanceStatus,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid startDate")]
    InvalidStart,
    #[error("Invalid endDate")]
    InvalidEnd,
}

/// Resolves report query dates into a half-open range. A missing end means
/// the end of the current UTC day.
pub fn report_range(start: &str, end: Option<&str>) -> Result<DateRange, RangeError> {
    let start = parse_date_param(start).ok_or(RangeError::InvalidStart)?;
    let end = match end {
        Some(raw) => parse_date_param(raw).ok_or(RangeError::InvalidEnd)?,
        None => DateRange::today().end,
    };
    Ok(DateRange::new(start, end))
}

pub struct AttendanceService {
    store: Arc<dyn Store>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates one record per entry, all dated `at`.
    ///
    /// The inserts run concurrently and are not wrapped in a transaction: if
    /// one fails the error is returned, but records already written stay.
    pub async fn mark(&self, entries: &[MarkEntry], at: DateTime<Utc>) -> StoreResult<Vec<Attendance>> {
        let creates = entries.iter().map(|entry| {
            self.store.create_attendance(NewAttendance {
                student_id: entry.student_id,
                date: at,
                status: entry.status,
            })
        });

        let records = try_join_all(creates).await?;
        info!("Marked attendance for {} student(s)", records.len());
        Ok(records)
    }

    pub async fn report(&self, division_id: i32, range: DateRange) -> StoreResult<Vec<AttendanceTally>> {
        debug!(
            "Attendance report for division {} from {} to {}",
            division_id, range.start, range.end
        );
        self.store.attendance_tallies(division_id, range).await
    }
}
