#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use attendance_api::app::{app, AppState};
use attendance_api::config::{AppConfig, StoreBackend};
use attendance_api::database::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Development defaults over an in-memory store, with a signing secret and a
/// cheap bcrypt cost so tests stay fast.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.api.enable_request_logging = false;
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config
}

/// An API server on its own port, stopped when dropped
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let router = app(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { port, base_url, state, handle })
    }

    pub fn api(&self) -> Api {
        Api {
            client: reqwest::Client::new(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    TestServer::spawn(test_config()).await
}

/// Thin JSON client returning `(status, body)` pairs
pub struct Api {
    pub client: reqwest::Client,
    pub base_url: String,
    pub token: Option<String>,
}

impl Api {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, Value)> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let res = request.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let body = if text.is_empty() { Value::Null } else { serde_json::from_str(&text)? };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.client.get(format!("{}{}", self.base_url, path))).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.post(format!("{}{}", self.base_url, path)).json(&body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.put(format!("{}{}", self.base_url, path)).json(&body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.client.delete(format!("{}{}", self.base_url, path))).await
    }

    pub async fn register(&self, username: &str, password: &str, division_ids: &[i64]) -> Result<Value> {
        let (status, body) = self
            .post(
                "/api/auth/register",
                json!({
                    "username": username,
                    "password": password,
                    "name": format!("Prof {}", username),
                    "department": "CS",
                    "isHOD": false,
                    "divisionIds": division_ids,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        Ok(body["professor"].clone())
    }

    /// Returns `(token, professor id)`
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, i64)> {
        let (status, body) = self
            .post("/api/auth/login", json!({ "username": username, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        let token = body["token"].as_str().context("missing token")?.to_string();
        let id = body["id"].as_i64().context("missing id")?;
        Ok((token, id))
    }

    pub async fn create_division(&self, name: &str) -> Result<i64> {
        let (status, body) = self.post("/api/divisions", json!({ "name": name })).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create division failed: {} {}", status, body);
        body["division"]["id"].as_i64().context("missing division id")
    }

    pub async fn create_student(&self, name: &str, division_id: i64, roll_number: Option<i64>) -> Result<i64> {
        let (status, body) = self
            .post(
                "/api/students",
                json!({ "name": name, "divisionId": division_id, "rollNumber": roll_number }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create student failed: {} {}", status, body);
        body["student"]["id"].as_i64().context("missing student id")
    }
}
