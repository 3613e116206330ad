//! Resource CRUD handlers: create, read, update, delete, list.
//! One generic function per operation, instantiated per (backend, resource).

use crate::error::AppError;
use crate::model::Resource;
use crate::response;
use crate::service::CrudService;
use crate::store::ResourceStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// Malformed or non-JSON bodies are validation failures like any other.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| AppError::Validation(e.body_text()))
}

pub async fn list<S, R>(State(store): State<Arc<S>>) -> Result<impl IntoResponse, AppError>
where
    S: ResourceStore<R>,
    R: Resource,
{
    let rows: Vec<R> = CrudService::list(store.as_ref()).await?;
    Ok(response::ok_many(rows))
}

pub async fn create<S, R>(
    State(store): State<Arc<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    S: ResourceStore<R>,
    R: Resource,
{
    let body = json_body(body)?;
    let record: R = CrudService::create(store.as_ref(), body).await?;
    Ok(response::created(record))
}

pub async fn read<S, R>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    S: ResourceStore<R>,
    R: Resource,
{
    let record: R = CrudService::read(store.as_ref(), &id).await?;
    Ok(response::ok(record))
}

pub async fn update<S, R>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    S: ResourceStore<R>,
    R: Resource,
{
    let body = json_body(body)?;
    let record: R = CrudService::update(store.as_ref(), &id, body).await?;
    Ok(response::ok(record))
}

pub async fn delete<S, R>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: ResourceStore<R>,
    R: Resource,
{
    CrudService::delete::<R, S>(store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
