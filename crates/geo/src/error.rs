//! Codec errors.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Debug, Error)]
pub enum GeoError {
    /// Text that is not exactly two numeric components
    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),

    /// Structurally valid but unusable coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}
