//! Configuration loading and schema definitions
//!
//! TOML file values with environment overrides, shared by every agrimap crate.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
