//! Store behaviour against a real Postgres database.
//!
//! Each test connects with `DATABASE_URL` (from the environment or `.env`)
//! and applies the migrations first. Without a database URL they pass
//! without doing anything. Rows are never cleaned up, so every test uses
//! its own usernames and divisions.

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use chrono::{Duration, Utc};

use attendance_api::config::{AppConfig, StoreBackend};
use attendance_api::database::models::{
    AttendanceStatus, DateRange, NewAttendance, NewProfessor, NewStudent,
};
use attendance_api::database::{DatabaseManager, PgStore, Store, StoreError};

async fn pg_store() -> Result<Option<PgStore>> {
    dotenvy::dotenv().ok();
    let Some(url) = std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()) else {
        eprintln!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.backend = StoreBackend::Postgres;
    config.url = Some(url);
    config.max_connections = 2;

    let store = PgStore::new(DatabaseManager::connect(&config).await?);
    store.migrate().await?;
    Ok(Some(store))
}

/// Names that stay unique across tests and across runs on the same database
fn unique(prefix: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap_or_default(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

fn new_professor(username: &str) -> NewProfessor {
    NewProfessor {
        username: username.to_string(),
        password_hash: "hash".to_string(),
        name: "Ada".to_string(),
        department: "CS".to_string(),
        is_hod: false,
    }
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let username = unique("ada");

    store.create_professor(new_professor(&username), &[]).await?;
    let err = store.create_professor(new_professor(&username), &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn unknown_division_rolls_back_registration() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let username = unique("ada");

    let err = store
        .create_professor(new_professor(&username), &[i32::MAX])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
    assert!(store.find_professor_by_username(&username).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn assignments_are_not_duplicated() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };

    let division = store.create_division(&unique("div")).await?;
    let professor = store
        .create_professor(new_professor(&unique("ada")), &[division.id])
        .await?;
    store.assign_divisions(professor.id, &[division.id, division.id]).await?;
    store.assign_divisions(professor.id, &[division.id]).await?;

    assert_eq!(store.professor_divisions(professor.id).await?, vec![division]);
    Ok(())
}

#[tokio::test]
async fn unknown_references_are_not_found() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };

    let err = store
        .create_student(NewStudent { name: "Sam".into(), roll_number: None, division_id: i32::MAX })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");

    let err = store
        .create_attendance(NewAttendance {
            student_id: i32::MAX,
            date: Utc::now(),
            status: AttendanceStatus::Present,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn student_with_attendance_cannot_be_deleted() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };

    let division = store.create_division(&unique("div")).await?;
    let student = store
        .create_student(NewStudent { name: "Sam".into(), roll_number: Some(1), division_id: division.id })
        .await?;
    let record = store
        .create_attendance(NewAttendance {
            student_id: student.id,
            date: Utc::now(),
            status: AttendanceStatus::Absent,
        })
        .await?;
    assert_eq!(record.status, AttendanceStatus::Absent);

    let err = store.delete_student(student.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
    assert!(store.find_student(student.id).await?.is_some());

    let spare = store
        .create_student(NewStudent { name: "Kim".into(), roll_number: None, division_id: division.id })
        .await?;
    assert!(store.delete_student(spare.id).await?);
    assert!(!store.delete_student(spare.id).await?);
    Ok(())
}

#[tokio::test]
async fn tallies_only_count_records_inside_the_range() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };

    let division = store.create_division(&unique("div")).await?;
    let sam = store
        .create_student(NewStudent { name: "Sam".into(), roll_number: Some(1), division_id: division.id })
        .await?;
    let kim = store
        .create_student(NewStudent { name: "Kim".into(), roll_number: Some(2), division_id: division.id })
        .await?;

    let range = DateRange::today();
    for (student_id, date, status) in [
        (sam.id, range.start, AttendanceStatus::Present),
        (sam.id, range.start + Duration::hours(3), AttendanceStatus::Absent),
        (sam.id, range.end, AttendanceStatus::Present),
        (kim.id, range.start + Duration::hours(1), AttendanceStatus::Present),
    ] {
        store
            .create_attendance(NewAttendance { student_id, date, status })
            .await?;
    }

    let tallies = store.attendance_tallies(division.id, range).await?;
    assert_eq!(tallies.len(), 2);
    assert_eq!((tallies[0].student_id, tallies[0].present, tallies[0].absent), (sam.id, 1, 1));
    assert_eq!(tallies[1].student_name, "Kim");
    assert_eq!((tallies[1].present, tallies[1].absent), (1, 0));
    assert_eq!(store.count_division_attendance(division.id, range).await?, 3);

    let history = store.student_attendance(sam.id, range.start, range.end).await?;
    assert_eq!(history.len(), 3);
    Ok(())
}
