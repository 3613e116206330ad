//! Shared application state: settings plus one connected store per backend.

use crate::config::Settings;
use crate::error::StoreError;
use crate::store::{Backend, MongoStore, MySqlStore, PgStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub mongodb: Arc<MongoStore>,
    pub mysql: Arc<MySqlStore>,
    pub postgresql: Arc<PgStore>,
}

impl AppState {
    /// Connect MongoDB, MySQL, PostgreSQL in that order, then ensure the
    /// relational schemas. Any failure aborts.
    pub async fn connect(settings: Settings) -> Result<Self, StoreError> {
        let mongodb = MongoStore::connect(&settings.mongodb, &settings.pool).await?;
        let mysql = MySqlStore::connect(&settings.mysql, &settings.pool).await?;
        let postgresql = PgStore::connect(&settings.postgresql, &settings.pool).await?;

        mysql.ensure_schema().await?;
        postgresql.ensure_schema().await?;

        Ok(AppState {
            settings: Arc::new(settings),
            mongodb: Arc::new(mongodb),
            mysql: Arc::new(mysql),
            postgresql: Arc::new(postgresql),
        })
    }

    /// Release every backend, last connected first.
    pub async fn shutdown(&self) {
        self.postgresql.disconnect().await;
        self.mysql.disconnect().await;
        self.mongodb.disconnect().await;
    }
}
