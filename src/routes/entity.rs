//! Resource routes. Every backend serves the same paths; the store behind them
//! is the only difference.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::handlers::health;
use crate::model::{Order, Product, Resource, User};
use crate::store::ResourceStore;
use axum::{routing::get, Router};
use std::sync::Arc;

/// `/{table}` and `/{table}/:id` for one resource.
pub fn resource_routes<S, R>() -> Router<Arc<S>>
where
    S: ResourceStore<R>,
    R: Resource,
{
    let base = format!("/{}", R::TABLE);
    Router::new()
        .route(&base, get(list::<S, R>).post(create::<S, R>))
        .route(
            &format!("{}/:id", base),
            get(read::<S, R>).put(update::<S, R>).delete(delete_handler::<S, R>),
        )
}

/// Health plus users, products and orders for one backend.
pub fn backend_routes<S>(store: Arc<S>) -> Router
where
    S: ResourceStore<User> + ResourceStore<Product> + ResourceStore<Order>,
{
    Router::new()
        .route("/health", get(health::<S>))
        .merge(resource_routes::<S, User>())
        .merge(resource_routes::<S, Product>())
        .merge(resource_routes::<S, Order>())
        .with_state(store)
}
