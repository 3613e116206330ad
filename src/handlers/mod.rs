//! HTTP handlers: resource CRUD and per-backend health, generic over the store.

pub mod entity;
pub mod health;
pub use entity::*;
pub use health::*;
