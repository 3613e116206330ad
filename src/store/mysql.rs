//! MySQL adapter: hand-built statements over a sqlx pool. Rows map straight into
//! the resource structs through `FromRow`.

use super::{Backend, ResourceStore};
use crate::config::{PoolSettings, SqlSettings};
use crate::error::StoreError;
use crate::migration;
use crate::model::{ChangeSet, Resource};
use crate::sql::{self, OrderBy, QueryBuf};
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlPoolOptions, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, MySql, MySqlPool};
use std::time::Duration;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(settings: &SqlSettings, pool: &PoolSettings) -> Result<Self, StoreError> {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database)
            .charset("utf8mb4");
        let pool = MySqlPoolOptions::new()
            .min_connections(pool.min_connections)
            .max_connections(pool.max_connections)
            .max_lifetime(Duration::from_secs(3600))
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.ping().await?;
        tracing::info!(database = %settings.database, "connected to MySQL");
        Ok(store)
    }

    /// Pooled connection, returned to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, StoreError> {
        Ok(self.pool.acquire().await?)
    }
}

fn query(q: &QueryBuf) -> Query<'_, MySql, MySqlArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params
        .iter()
        .cloned()
        .fold(sqlx::query(&q.sql), |query, p| query.bind(p))
}

fn query_as<R>(q: &QueryBuf) -> QueryAs<'_, MySql, R, MySqlArguments>
where
    R: for<'r> FromRow<'r, MySqlRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params
        .iter()
        .cloned()
        .fold(sqlx::query_as::<_, R>(&q.sql), |query, p| query.bind(p))
}

async fn execute(conn: &mut MySqlConnection, q: &QueryBuf) -> Result<u64, StoreError> {
    Ok(query(q).execute(conn).await?.rows_affected())
}

#[async_trait]
impl Backend for MySqlStore {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        migration::apply_mysql(&self.pool).await
    }

    async fn disconnect(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("disconnected from MySQL");
    }
}

#[async_trait]
impl<R> ResourceStore<R> for MySqlStore
where
    R: Resource + for<'r> FromRow<'r, MySqlRow>,
{
    async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let q = sql::insert(R::TABLE, record.row());
        let mut conn = self.acquire().await?;
        execute(&mut conn, &q).await?;
        Ok(())
    }

    async fn find_one(&self, id: &str) -> Result<Option<R>, StoreError> {
        let q = sql::select_by_id(R::TABLE, R::COLUMNS, id);
        let mut conn = self.acquire().await?;
        Ok(query_as::<R>(&q).fetch_optional(&mut *conn).await?)
    }

    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let q = sql::select_all(R::TABLE, R::COLUMNS, Some(OrderBy::desc("created_at")));
        let mut conn = self.acquire().await?;
        Ok(query_as::<R>(&q).fetch_all(&mut *conn).await?)
    }

    /// Affected-rows is zero when the new values equal the old ones, so existence
    /// comes from a locked read in the same transaction.
    async fn update_fields(&self, id: &str, changes: &ChangeSet) -> Result<bool, StoreError> {
        let lock = sql::lock_by_id(R::TABLE, id);
        let q = sql::update(R::TABLE, id, changes);
        let mut tx = self.pool.begin().await?;
        if query(&lock).fetch_optional(&mut *tx).await?.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }
        execute(&mut tx, &q).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let q = sql::delete(R::TABLE, id);
        let mut conn = self.acquire().await?;
        execute(&mut conn, &q).await
    }
}
