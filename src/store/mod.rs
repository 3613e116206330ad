//! Storage adapters. Every backend implements `Backend` for its lifecycle and
//! `ResourceStore<R>` for each resource it stores.

mod memory;
mod mongo;
mod mysql;
pub mod postgres;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use mysql::MySqlStore;
pub use postgres::PgStore;

use crate::error::StoreError;
use crate::model::{ChangeSet, Resource};
use async_trait::async_trait;

#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Display name reported by health probes.
    fn name(&self) -> &'static str;

    /// One trivial round trip to the server.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Idempotent DDL. Schemaless backends do nothing.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Release pooled resources. Safe to call more than once.
    async fn disconnect(&self);
}

#[async_trait]
pub trait ResourceStore<R: Resource>: Backend {
    async fn insert(&self, record: &R) -> Result<(), StoreError>;

    async fn find_one(&self, id: &str) -> Result<Option<R>, StoreError>;

    async fn find_all(&self) -> Result<Vec<R>, StoreError>;

    /// Apply `changes` to the record with `id`. Returns false when no such record exists.
    async fn update_fields(&self, id: &str, changes: &ChangeSet) -> Result<bool, StoreError>;

    /// Returns the number of records removed.
    async fn delete_one(&self, id: &str) -> Result<u64, StoreError>;
}
