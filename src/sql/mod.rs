//! Safe SQL builder: identifiers from resource definitions only, values as parameters.

mod builder;
mod params;
pub use builder::*;
