//! In-process store for tests and local runs. Records are kept as JSON objects per
//! table in insertion order.

use super::{Backend, ResourceStore};
use crate::error::StoreError;
use crate::model::{ChangeSet, Resource};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

type Tables = HashMap<&'static str, Vec<Value>>;

pub struct MemoryStore {
    name: &'static str,
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::named("Memory")
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            tables: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{} store offline", self.name)));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("mutex poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn has_id(value: &Value, id: &str) -> bool {
    value.get("id").and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl Backend for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }

    async fn disconnect(&self) {}
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore {
    async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.tables()?.entry(R::TABLE).or_default().push(value);
        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<R>, StoreError> {
        let found = self
            .tables()?
            .get(R::TABLE)
            .and_then(|rows| rows.iter().find(|v| has_id(v, id)).cloned());
        Ok(found.map(serde_json::from_value).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let rows = self.tables()?.get(R::TABLE).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<R>, _>>()?)
    }

    async fn update_fields(&self, id: &str, changes: &ChangeSet) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let Some(Value::Object(row)) = tables
            .get_mut(R::TABLE)
            .and_then(|rows| rows.iter_mut().find(|v| has_id(v, id)))
        else {
            return Ok(false);
        };
        for (field, value) in changes.iter() {
            row.insert(field.to_string(), value.to_json());
        }
        Ok(true)
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables()?;
        let Some(rows) = tables.get_mut(R::TABLE) else {
            return Ok(0);
        };
        match rows.iter().position(|v| has_id(v, id)) {
            Some(i) => {
                rows.remove(i);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
