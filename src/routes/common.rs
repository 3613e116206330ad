//! Common routes: welcome, health, version, OpenAPI document.

use crate::config::Settings;
use crate::openapi;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    app_name: String,
    version: String,
}

async fn root(State(settings): State<Arc<Settings>>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", settings.app_name),
        "version": settings.app_version,
        "databases": ["MongoDB", "MySQL", "PostgreSQL"],
        "endpoints": {
            "MongoDB": "/api/v1/mongodb/users",
            "MySQL": "/api/v1/mysql/users",
            "PostgreSQL": "/api/v1/postgresql/users"
        }
    }))
}

/// Process liveness only; backend probes live under each backend prefix.
async fn health(State(settings): State<Arc<Settings>>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        app_name: settings.app_name.clone(),
        version: settings.app_version.clone(),
    })
}

async fn version() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn openapi_json(State(settings): State<Arc<Settings>>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::document(&settings))
}

/// GET /, /health, /version, /openapi.json.
pub fn common_routes(settings: Arc<Settings>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/openapi.json", get(openapi_json))
        .with_state(settings)
}
