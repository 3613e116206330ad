//! OpenAPI document: resource schemas and the health body.

use crate::config::Settings;
use crate::model::{
    CreateOrder, CreateProduct, CreateUser, Order, Product, UpdateOrder, UpdateProduct, UpdateUser, User,
};
use crate::response::HealthBody;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(description = "CRUD for users, products and orders over MongoDB, MySQL and PostgreSQL"),
    components(schemas(
        User,
        CreateUser,
        UpdateUser,
        Product,
        CreateProduct,
        UpdateProduct,
        Order,
        CreateOrder,
        UpdateOrder,
        HealthBody
    ))
)]
pub struct ApiDoc;

/// The document with title and version taken from settings.
pub fn document(settings: &Settings) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = settings.app_name.clone();
    doc.info.version = settings.app_version.clone();
    doc
}
