//! Coordinate handling for agrimap.
//!
//! This crate provides:
//! - The [`Coordinate`] type shared by storage, services and the maps client
//! - A coordinate codec between `"lat,long"` text and the stored point form
//! - Planar point distance (the semantics of the storage `<->` operator)
//! - Order-preserving batch partitioning for capped provider calls
//!
//! # Example
//!
//! ```
//! use agrimap_geo::{to_display, to_storage, Coordinate};
//!
//! let stored = to_storage("55.6761, 12.5683").unwrap();
//! assert_eq!(stored.to_string(), "(55.6761, 12.5683)");
//!
//! let coord: Coordinate = stored.into();
//! assert_eq!(to_display(&coord), "55.6761,12.5683");
//! ```

pub mod batch;
mod codec;
mod distance;
mod error;

pub use batch::{create_batches, DEFAULT_MAX_PER_BATCH};
pub use codec::{to_display, to_storage, PointValue, StoredPoint};
pub use distance::planar_distance;
pub use error::{GeoError, Result};

use std::fmt;
use std::str::FromStr;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when latitude is within ±90 and longitude within ±180 degrees.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Renders the display form, `lat,long`.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Parses `lat,long`, with or without the storage parentheses.
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        PointValue::Text(s.to_string()).to_coordinate()
    }
}
