//! Response helpers. Records are returned bare, lists as a JSON array.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of a per-backend health probe.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HealthBody {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

impl HealthBody {
    pub fn healthy(database: &str) -> Self {
        HealthBody {
            status: "healthy".into(),
            database: database.into(),
            timestamp: crate::model::now().to_rfc3339(),
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn ok_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Vec<T>>) {
    (StatusCode::OK, Json(data))
}
