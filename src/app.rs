use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::database::Store;
use crate::handlers;
use crate::middleware::{json_method_not_allowed, jwt_auth_middleware};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(division_routes())
        .merge(student_routes())
        .merge(attendance_routes())
        .merge(professor_routes())
        .merge(dashboard_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(state.config.environment, &state.config.security) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(environment: Environment, security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if environment == Environment::Development {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
}

fn division_routes() -> Router<AppState> {
    use handlers::protected::divisions;

    Router::new()
        .route("/api/divisions", get(divisions::list).post(divisions::create))
        .route("/api/divisions/:id", get(divisions::show))
}

fn student_routes() -> Router<AppState> {
    use handlers::protected::students;

    Router::new()
        .route("/api/students", get(students::list).post(students::create))
        .route(
            "/api/students/:id",
            get(students::show)
                .put(students::update)
                .delete(students::remove),
        )
        .route("/api/students/:id/attendance", post(students::attendance))
}

fn attendance_routes() -> Router<AppState> {
    use handlers::protected::attendance;

    Router::new()
        .route("/api/attendance", post(attendance::record))
        .route("/api/attendance/mark", post(attendance::mark))
        .route("/api/attendance/report", get(attendance::report))
}

fn professor_routes() -> Router<AppState> {
    use handlers::protected::professors;

    Router::new()
        .route(
            "/api/professors/updateDivisions",
            post(professors::update_divisions),
        )
        .route(
            "/api/professors/:id",
            get(professors::show).post(professors::show),
        )
}

fn dashboard_routes() -> Router<AppState> {
    use handlers::protected::dashboard;

    Router::new().route("/api/dashboard", get(dashboard::summary))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "name": "Attendance API",
        "version": version,
        "endpoints": {
            "auth": "/api/auth/login, /api/auth/register (public)",
            "divisions": "/api/divisions[/:id]",
            "students": "/api/students[/:id[/attendance]]",
            "attendance": "/api/attendance, /api/attendance/mark, /api/attendance/report",
            "professors": "/api/professors/:id, /api/professors/updateDivisions",
            "dashboard": "/api/dashboard?professorId=",
            "health": "/health (public)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "status": "degraded",
                    "timestamp": now
                })),
            )
        }
    }
}
