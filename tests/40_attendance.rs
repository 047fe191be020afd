mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn report(api: &common::Api, division: i64, start: &str) -> Result<Value> {
    let (status, body) = api
        .get(&format!("/api/attendance/report?startDate={}&divisionId={}", start, division))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    Ok(body["report"].clone())
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn marking_creates_one_record_per_student() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let division = api.create_division("D").await?;

    let mut entries = Vec::new();
    for (i, name) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let id = api.create_student(name, division, Some(i as i64 + 1)).await?;
        let status = if i % 2 == 0 { "Present" } else { "Absent" };
        entries.push(json!({ "studentId": id, "status": status }));
    }

    let before = Utc::now();
    let (status, body) = api.post("/api/attendance/mark", json!({ "attendance": entries })).await?;
    assert_eq!(status, StatusCode::OK);

    let records = body["attendanceRecords"].as_array().unwrap();
    assert_eq!(records.len(), 5);
    for (record, entry) in records.iter().zip(&entries) {
        assert_eq!(record["studentId"], entry["studentId"]);
        assert_eq!(record["status"], entry["status"]);
        let date: chrono::DateTime<Utc> = record["date"].as_str().unwrap().parse()?;
        assert!(date >= before - Duration::seconds(1) && date <= Utc::now());
    }
    Ok(())
}

#[tokio::test]
async fn mark_rejects_bad_payloads() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();

    let (status, _) = api.post("/api/attendance/mark", json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .post("/api/attendance/mark", json!({ "attendance": [{ "studentId": 1, "status": "Late" }] }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .post("/api/attendance/mark", json!({ "attendance": [{ "studentId": 42, "status": "Present" }] }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn report_for_today_tallies_each_student() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let division = api.create_division("D").await?;
    let a = api.create_student("A", division, None).await?;
    let b = api.create_student("B", division, None).await?;
    api.create_student("Never marked", division, None).await?;

    api.post(
        "/api/attendance/mark",
        json!({ "attendance": [
            { "studentId": a, "status": "Present" },
            { "studentId": b, "status": "Absent" },
        ] }),
    )
    .await?;

    let rows = report(&api, division, &today()).await?;
    assert_eq!(
        rows,
        json!([
            { "studentId": a, "studentName": "A", "present": 1, "absent": 0 },
            { "studentId": b, "studentName": "B", "present": 0, "absent": 1 },
        ])
    );
    Ok(())
}

#[tokio::test]
async fn report_totals_match_records_in_range() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let division = api.create_division("D").await?;
    let other = api.create_division("Other").await?;
    let a = api.create_student("A", division, None).await?;
    let outsider = api.create_student("X", other, None).await?;

    for (student, date, status) in [
        (a, "2024-05-01T08:00:00Z", "Present"),
        (a, "2024-05-02T08:00:00Z", "Absent"),
        (a, "2024-05-03T08:00:00Z", "Present"),
        (a, "2024-04-30T08:00:00Z", "Present"),
        (outsider, "2024-05-01T08:00:00Z", "Present"),
    ] {
        api.post("/api/attendance", json!({ "studentId": student, "date": date, "status": status }))
            .await?;
    }

    let (status, body) = api
        .get(&format!(
            "/api/attendance/report?startDate=2024-05-01&endDate=2024-05-03&divisionId={}",
            division
        ))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"], json!([{ "studentId": a, "studentName": "A", "present": 1, "absent": 1 }]));

    // endDate defaults to the end of today
    let rows = report(&api, division, "2024-05-01").await?;
    assert_eq!(rows[0]["present"].as_i64().unwrap() + rows[0]["absent"].as_i64().unwrap(), 3);

    let (status, _) = api.get("/api/attendance/report?startDate=2024-05-01").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = api
        .get(&format!("/api/attendance/report?startDate=whenever&divisionId={}", division))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn single_record_requires_known_student() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();

    let (status, _) = api
        .post("/api/attendance", json!({ "studentId": 1, "status": "Present" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .post(
            "/api/attendance",
            json!({ "studentId": 1, "date": "2024-01-01", "status": "Present" }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn dashboard_shows_whether_attendance_was_taken_today() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let marked = api.create_division("Marked").await?;
    let pending = api.create_division("Pending").await?;
    let professor = api.register("ada", "pw", &[marked, pending]).await?;

    let student = api.create_student("A", marked, None).await?;
    let late = api.create_student("B", pending, None).await?;
    api.post(
        "/api/attendance/mark",
        json!({ "attendance": [{ "studentId": student, "status": "Absent" }] }),
    )
    .await?;
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    api.post("/api/attendance", json!({ "studentId": late, "date": yesterday, "status": "Present" }))
        .await?;

    let (status, body) = api.get(&format!("/api/dashboard?professorId={}", professor["id"])).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["divisions"],
        json!([
            { "id": marked, "name": "Marked", "studentCount": 1, "attendanceTaken": true },
            { "id": pending, "name": "Pending", "studentCount": 1, "attendanceTaken": false },
        ])
    );

    let (status, _) = api.get("/api/dashboard").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_divisions_adds_without_duplicates() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let a = api.create_division("A").await?;
    let b = api.create_division("B").await?;
    let professor = api.register("ada", "pw", &[a]).await?;
    let id = professor["id"].as_i64().unwrap();

    for _ in 0..2 {
        let (status, body) = api
            .post("/api/professors/updateDivisions", json!({ "professorId": id, "divisionIds": [a, b] }))
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Divisions updated successfully");
    }

    let (status, body) = api.post(&format!("/api/professors/{}", id), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["professor"]["divisions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![a, b]);

    let (status, _) = api
        .post("/api/professors/updateDivisions", json!({ "professorId": 999, "divisionIds": [a] }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = api
        .post("/api/professors/updateDivisions", json!({ "professorId": id, "divisionIds": [999] }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = api.get("/api/professors/999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
