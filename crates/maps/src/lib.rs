//! Google Maps client for agrimap
//!
//! This crate talks to the Google Maps web services on behalf of the farm
//! and user services.
//!
//! # Features
//!
//! - **Environment-based configuration**: API key, base URL and timeout
//! - **Distance Matrix**: driving distances from one origin, batched under the
//!   per-call destination cap with a timeout per batch
//! - **Geocoding**: first-match address resolution
//! - **Request correlation**: every request carries a unique ID in its span
//!
//! # Example
//!
//! ```rust,no_run
//! use agrimap_geo::Coordinate;
//! use agrimap_maps::{DrivingDistances, GoogleMapsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GoogleMapsClient::new()?;
//!     let distances = DrivingDistances::from_config(Arc::new(client.clone()), client.config());
//!
//!     let origin = Coordinate::new(55.6761, 12.5683);
//!     let farms = [Coordinate::new(56.1629, 10.2039)];
//!     let km = distances.get_driving_distances(&origin, &farms).await?;
//!     println!("{km:?}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod driving;
pub mod endpoints;
pub mod error;
pub mod provider;

pub use client::{GoogleMapsClient, PROVIDER_NAME};
pub use config::MapsConfig;
pub use driving::DrivingDistances;
pub use error::{MapsError, MapsResult};
pub use provider::{DistanceMatrix, Geocoder};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::GoogleMapsClient;
    pub use crate::config::MapsConfig;
    pub use crate::driving::DrivingDistances;
    pub use crate::endpoints::{DistanceMatrixApi, GeocodeApi};
    pub use crate::error::{MapsError, MapsResult};
    pub use crate::provider::{DistanceMatrix, Geocoder};
}
