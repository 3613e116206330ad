//! PostgreSQL adapter through sea-orm. Reads go straight to the connection;
//! every mutation runs in its own transaction.

pub mod entity;

use super::{Backend, ResourceStore};
use crate::config::{PoolSettings, SqlSettings};
use crate::error::StoreError;
use crate::migration;
use crate::model::{ChangeSet, FieldValue, Order, Product, User};
use async_trait::async_trait;
use entity::{order, product, user};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    SqlxPostgresConnector, TransactionTrait,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;

pub struct PgStore {
    pool: PgPool,
    db: DatabaseConnection,
}

impl PgStore {
    pub async fn connect(settings: &SqlSettings, pool: &PoolSettings) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database);
        let pool = PgPoolOptions::new()
            .min_connections(pool.min_connections)
            .max_connections(pool.max_connections)
            .connect_with(options)
            .await?;
        let db = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
        let store = Self { pool, db };
        store.ping().await?;
        tracing::info!(database = %settings.database, "connected to PostgreSQL");
        Ok(store)
    }

    /// Unit of work. Commit explicitly; dropping it rolls back.
    pub async fn session(&self) -> Result<DatabaseTransaction, StoreError> {
        Ok(self.db.begin().await?)
    }
}

/// Bind a column assignment. NULL stays untyped so it fits any column.
fn orm_expr(value: &FieldValue) -> SimpleExpr {
    match value {
        FieldValue::Null => Expr::cust("NULL"),
        FieldValue::Text(s) => Expr::value(s.clone()),
        FieldValue::Int(n) => Expr::value(*n),
        FieldValue::Float(f) => Expr::value(*f),
        FieldValue::Timestamp(t) => Expr::value(*t),
    }
}

#[async_trait]
impl Backend for PgStore {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.execute_unprepared("SELECT 1").await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        migration::apply_postgres(&self.db).await
    }

    async fn disconnect(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("disconnected from PostgreSQL");
    }
}

macro_rules! orm_resource {
    ($resource:ty, $entity:ident) => {
        #[async_trait]
        impl ResourceStore<$resource> for PgStore {
            async fn insert(&self, record: &$resource) -> Result<(), StoreError> {
                let txn = self.session().await?;
                $entity::Entity::insert($entity::ActiveModel::from(record.clone()))
                    .exec_without_returning(&txn)
                    .await?;
                txn.commit().await?;
                Ok(())
            }

            async fn find_one(&self, id: &str) -> Result<Option<$resource>, StoreError> {
                let found = $entity::Entity::find_by_id(id.to_string()).one(&self.db).await?;
                Ok(found.map(Into::into))
            }

            async fn find_all(&self) -> Result<Vec<$resource>, StoreError> {
                let rows = $entity::Entity::find().all(&self.db).await?;
                Ok(rows.into_iter().map(Into::into).collect())
            }

            async fn update_fields(&self, id: &str, changes: &ChangeSet) -> Result<bool, StoreError> {
                let mut update = $entity::Entity::update_many().filter($entity::Column::Id.eq(id));
                for (field, value) in changes.iter() {
                    let column = $entity::Column::from_str(field)
                        .map_err(|_| StoreError::Codec(format!("unknown column '{}'", field)))?;
                    update = update.col_expr(column, orm_expr(value));
                }
                let txn = self.session().await?;
                let result = update.exec(&txn).await?;
                txn.commit().await?;
                Ok(result.rows_affected > 0)
            }

            async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
                let txn = self.session().await?;
                let result = $entity::Entity::delete_by_id(id.to_string()).exec(&txn).await?;
                txn.commit().await?;
                Ok(result.rows_affected)
            }
        }
    };
}

orm_resource!(User, user);
orm_resource!(Product, product);
orm_resource!(Order, order);
