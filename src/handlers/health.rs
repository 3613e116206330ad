use crate::error::AppError;
use crate::response::HealthBody;
use crate::store::Backend;
use axum::{extract::State, Json};
use std::sync::Arc;

/// One round trip to the backend. 503 when it fails.
pub async fn health<S: Backend>(State(store): State<Arc<S>>) -> Result<Json<HealthBody>, AppError> {
    if let Err(e) = store.ping().await {
        return Err(AppError::Unavailable(format!(
            "{} health check failed: {}",
            store.name(),
            e
        )));
    }
    Ok(Json(HealthBody::healthy(store.name())))
}
