//! Multi-database CRUD API: users, products and orders served identically over
//! MongoDB, MySQL and PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_dotenv, Settings};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Order, Product, Resource, User};
pub use routes::{api_router, app_router, common_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{Backend, MemoryStore, MongoStore, MySqlStore, PgStore, ResourceStore};
