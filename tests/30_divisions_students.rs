mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn divisions_list_with_students() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();

    let (status, body) = api.post("/api/divisions", json!({ "name": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let a = api.create_division("A").await?;
    let b = api.create_division("B").await?;
    api.create_student("Sam", a, Some(1)).await?;

    let (status, body) = api.get("/api/divisions").await?;
    assert_eq!(status, StatusCode::OK);
    let divisions = body["divisions"].as_array().unwrap();
    assert_eq!(divisions.len(), 2);
    assert_eq!(divisions[0]["students"][0]["name"], "Sam");
    assert_eq!(divisions[1]["id"], b);
    assert_eq!(divisions[1]["students"], json!([]));

    let (status, body) = api.get(&format!("/api/divisions?id={}", a)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["division"]["name"], "A");
    assert_eq!(body["division"]["students"].as_array().unwrap().len(), 1);

    let (status, _) = api.get("/api/divisions?id=999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn division_detail_averages_todays_records() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let division = api.create_division("A").await?;
    api.register("ada", "pw", &[division]).await?;

    let (_, body) = api.get(&format!("/api/divisions/{}", division)).await?;
    assert_eq!(body["division"]["avgAttendance"], 0.0);

    let mut students = Vec::new();
    for name in ["A", "B", "C", "D"] {
        students.push(api.create_student(name, division, None).await?);
    }
    let marks: Vec<_> = students[..3]
        .iter()
        .map(|id| json!({ "studentId": id, "status": "Present" }))
        .collect();
    let (status, _) = api.post("/api/attendance/mark", json!({ "attendance": marks })).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = api.get(&format!("/api/divisions/{}", division)).await?;
    assert_eq!(status, StatusCode::OK);
    let detail = &body["division"];
    assert_eq!(detail["avgAttendance"], 0.75);
    assert_eq!(detail["students"].as_array().unwrap().len(), 4);
    assert_eq!(detail["professors"][0]["username"], "ada");
    assert!(detail["professors"][0].get("password").is_none());

    let (status, _) = api.get("/api/divisions/999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn student_lifecycle() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let a = api.create_division("A").await?;
    let b = api.create_division("B").await?;

    let (status, body) = api
        .post("/api/students", json!({ "name": "Sam", "divisionId": a, "rollNumber": 7 }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student added successfully");
    let id = body["student"]["id"].as_i64().unwrap();

    // Division reference resolves after creation
    let (status, body) = api.get(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["rollNumber"], 7);
    assert_eq!(body["student"]["division"]["id"], a);
    assert_eq!(body["student"]["division"]["name"], "A");

    let (status, body) = api.get(&format!("/api/students?divisionId={}", a)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);

    let (status, body) = api
        .put(
            &format!("/api/students/{}", id),
            json!({ "name": "Samuel", "rollNumber": 8, "divisionId": b }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["name"], "Samuel");
    assert_eq!(body["student"]["division"]["name"], "B");

    let (status, body) = api.delete(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student removed successfully");

    let (status, _) = api.get(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = api.delete(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn student_validation_and_missing_references() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let a = api.create_division("A").await?;
    let id = api.create_student("Sam", a, None).await?;

    let (status, _) = api.post("/api/students", json!({ "name": "Sam" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api
        .post("/api/students", json!({ "name": "Sam", "divisionId": 999 }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Division not found");

    let (status, _) = api.get("/api/students").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .put(&format!("/api/students/{}", id), json!({ "name": "Sam", "divisionId": a }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .put("/api/students/999", json!({ "name": "X", "rollNumber": 1, "divisionId": a }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn student_with_attendance_cannot_be_removed() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let a = api.create_division("A").await?;
    let id = api.create_student("Sam", a, None).await?;

    api.post("/api/attendance/mark", json!({ "attendance": [{ "studentId": id, "status": "Present" }] }))
        .await?;

    let (status, body) = api.delete(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = api.get(&format!("/api/students/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn student_history_is_inclusive_and_ordered() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();
    let a = api.create_division("A").await?;
    let id = api.create_student("Sam", a, None).await?;

    for (date, status) in [
        ("2024-03-03T09:00:00Z", "Absent"),
        ("2024-03-01T09:00:00Z", "Present"),
        ("2024-02-28T09:00:00Z", "Present"),
        ("2024-03-05T00:00:00Z", "Present"),
    ] {
        let (code, _) = api
            .post("/api/attendance", json!({ "studentId": id, "date": date, "status": status }))
            .await?;
        assert_eq!(code, StatusCode::OK);
    }

    let (status, body) = api
        .post(
            &format!("/api/students/{}/attendance", id),
            json!({ "startDate": "2024-03-01", "endDate": "2024-03-05" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let statuses: Vec<_> = body["attendance"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["Present", "Absent", "Present"]);

    let (status, _) = api
        .post(&format!("/api/students/{}/attendance", id), json!({ "startDate": "2024-03-01" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .post(
            &format!("/api/students/{}/attendance", id),
            json!({ "startDate": "soon", "endDate": "2024-03-05" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
