//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("config load: {0}")]
    Load(String),
}

/// Failures raised by a storage adapter. Each driver keeps its own variant so the
/// message carries the native detail.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("sql: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("orm: {0}")]
    Orm(#[from] sea_orm::DbErr),
    #[error("codec: {0}")]
    Codec(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True when the backend rejected the write because of a unique, check or
    /// foreign-key constraint.
    pub fn is_constraint_violation(&self) -> bool {
        use sea_orm::{DbErr, RuntimeErr};
        let db = match self {
            StoreError::Sql(sqlx::Error::Database(e))
            | StoreError::Orm(DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e))))
            | StoreError::Orm(DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e)))) => e,
            _ => return false,
        };
        db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Codec(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Store(#[from] StoreError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Store(_) => "database_error",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
