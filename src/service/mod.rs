//! CrudService: the CRUD contract over any `ResourceStore`, plus request validation.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::{FieldKind, FieldRule, Format, RequestValidator, EMAIL_PATTERN};
