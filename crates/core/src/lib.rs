//! Core building blocks for the agrimap service
//!
//! This crate provides the functionality every other agrimap crate leans on:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Validation**: fluent input validation for requests and creation input
//!
//! # Example
//!
//! ```rust,no_run
//! use agrimap_core::{config::Config, error::exit_codes};
//!
//! let config = match Config::load(None) {
//!     Ok(config) => config,
//!     Err(err) => {
//!         eprintln!("{err}");
//!         std::process::exit(exit_codes::for_error(&err));
//!     }
//! };
//! println!("maps timeout: {} ms", config.schema.maps.timeout_ms);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}
