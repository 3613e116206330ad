//! Generic CRUD contract: validation, id handling and error mapping, shared by
//! every (backend, resource) pair.

use crate::error::{AppError, StoreError};
use crate::model::{new_id, now, parse_id, Resource};
use crate::service::RequestValidator;
use crate::store::ResourceStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// Validate, assign id and `created_at`, insert. Returns the stored record.
    pub async fn create<R, S>(store: &S, body: Value) -> Result<R, AppError>
    where
        R: Resource,
        S: ResourceStore<R> + ?Sized,
    {
        let body = body_to_map(body)?;
        RequestValidator::validate(&body, R::RULES)?;
        let input: R::Create = decode(body)?;
        let record = R::build(new_id(), now(), input);
        store.insert(&record).await.map_err(write_error::<R>)?;
        tracing::debug!(backend = store.name(), kind = R::KIND, id = record.id(), "created");
        Ok(record)
    }

    /// Fetch one record by its public id.
    pub async fn read<R, S>(store: &S, raw_id: &str) -> Result<R, AppError>
    where
        R: Resource,
        S: ResourceStore<R> + ?Sized,
    {
        let id = parse_id(raw_id)?;
        store
            .find_one(&id)
            .await?
            .ok_or_else(|| not_found::<R>(&id))
    }

    /// Every stored record. Ordering is whatever the backend yields.
    pub async fn list<R, S>(store: &S) -> Result<Vec<R>, AppError>
    where
        R: Resource,
        S: ResourceStore<R> + ?Sized,
    {
        Ok(store.find_all().await?)
    }

    /// Apply the supplied fields and refresh `updated_at`. An update carrying no
    /// fields is rejected before storage is touched.
    pub async fn update<R, S>(store: &S, raw_id: &str, body: Value) -> Result<R, AppError>
    where
        R: Resource,
        S: ResourceStore<R> + ?Sized,
    {
        let body = body_to_map(body)?;
        RequestValidator::validate_partial(&body, R::RULES)?;
        let update: R::Update = decode(body)?;
        let changes = R::changes(update);
        if changes.is_empty() {
            return Err(AppError::BadRequest("No data provided for update".into()));
        }
        let id = parse_id(raw_id)?;
        let found = store
            .update_fields(&id, &changes.touched(now()))
            .await
            .map_err(write_error::<R>)?;
        if !found {
            return Err(not_found::<R>(&id));
        }
        tracing::debug!(backend = store.name(), kind = R::KIND, id = %id, "updated");
        store
            .find_one(&id)
            .await?
            .ok_or_else(|| not_found::<R>(&id))
    }

    /// Physically remove one record. Removing a missing id is an error.
    pub async fn delete<R, S>(store: &S, raw_id: &str) -> Result<(), AppError>
    where
        R: Resource,
        S: ResourceStore<R> + ?Sized,
    {
        let id = parse_id(raw_id)?;
        let removed = store.delete_one(&id).await?;
        if removed == 0 {
            return Err(not_found::<R>(&id));
        }
        tracing::debug!(backend = store.name(), kind = R::KIND, id = %id, "deleted");
        Ok(())
    }
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::Validation("body must be a JSON object".into())),
    }
}

fn decode<T: DeserializeOwned>(body: HashMap<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(body.into_iter().collect()))
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn not_found<R: Resource>(id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}'", R::KIND, id))
}

fn write_error<R: Resource>(e: StoreError) -> AppError {
    if e.is_constraint_violation() {
        AppError::Conflict(format!("{} violates a constraint: {}", R::KIND, e))
    } else {
        AppError::Store(e)
    }
}
