//! CLI command implementations

pub mod farms;
pub mod health;
pub mod migrate;
pub mod seed;
pub mod users;
