use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub student_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i32,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
}

/// Per-student present/absent counts over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceTally {
    pub student_id: i32,
    pub student_name: String,
    pub present: i64,
    pub absent: i64,
}

/// Half-open `[start, end)` time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The full UTC calendar day containing `day`.
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        Self { start, end: start + Duration::days(1) }
    }

    pub fn today() -> Self {
        Self::for_day(Utc::now().date_naive())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Parses a date parameter as an RFC 3339 timestamp or a bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_date_param(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
}
