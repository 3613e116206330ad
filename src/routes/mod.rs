//! Router assembly: common routes at the root, one nested router per backend
//! under `/api/v1`.

pub mod common;
pub mod entity;

pub use common::common_routes;
pub use entity::{backend_routes, resource_routes};

use crate::config::Settings;
use crate::model::{Order, Product, User};
use crate::state::AppState;
use crate::store::ResourceStore;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

const BODY_LIMIT: usize = 1024 * 1024;

/// Full route table over any three stores.
pub fn api_router<M, Y, P>(settings: Arc<Settings>, mongodb: Arc<M>, mysql: Arc<Y>, postgresql: Arc<P>) -> Router
where
    M: ResourceStore<User> + ResourceStore<Product> + ResourceStore<Order>,
    Y: ResourceStore<User> + ResourceStore<Product> + ResourceStore<Order>,
    P: ResourceStore<User> + ResourceStore<Product> + ResourceStore<Order>,
{
    let api = Router::new()
        .nest("/mongodb", backend_routes(mongodb))
        .nest("/mysql", backend_routes(mysql))
        .nest("/postgresql", backend_routes(postgresql));
    with_middleware(common_routes(settings).nest(API_PREFIX, api))
}

pub fn app_router(state: &AppState) -> Router {
    api_router(
        state.settings.clone(),
        state.mongodb.clone(),
        state.mysql.clone(),
        state.postgresql.clone(),
    )
}

pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT)),
    )
}
