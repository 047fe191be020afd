mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;
    let (status, body) = server.api().get("/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_api() -> Result<()> {
    let server = common::spawn_server().await?;
    let (status, body) = server.api().get("/").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["endpoints"]["attendance"].as_str().unwrap().contains("/api/attendance/report"));
    Ok(())
}

#[tokio::test]
async fn wrong_method_gets_json_405() -> Result<()> {
    let server = common::spawn_server().await?;
    let res = reqwest::Client::new()
        .delete(format!("{}/api/divisions", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = res.headers().get("allow").map(|v| v.to_str().unwrap().to_string());
    assert!(allow.unwrap_or_default().contains("POST"));

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    Ok(())
}

#[tokio::test]
async fn auth_is_checked_before_the_method() -> Result<()> {
    let mut config = common::test_config();
    config.security.require_auth = true;
    let server = common::TestServer::spawn(config).await?;

    let res = reqwest::Client::new()
        .delete(format!("{}/api/divisions", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get("allow").is_none());
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn malformed_input_is_a_400_envelope() -> Result<()> {
    let server = common::spawn_server().await?;
    let api = server.api();

    let res = api
        .client
        .post(format!("{}/api/divisions", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = api.get("/api/students/abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.get("/api/dashboard?professorId=x").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api
        .post("/api/professors/updateDivisions", json!({ "professorId": 1, "divisionIds": "1" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
