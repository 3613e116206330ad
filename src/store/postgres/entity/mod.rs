//! sea-orm entities for the relational tables. Each converts to and from the
//! backend-neutral resource struct.

pub mod order;
pub mod product;
pub mod user;
