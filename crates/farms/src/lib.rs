//! Farm listing and ranking for agrimap
//!
//! Farms are fetched through a [`FarmStore`] using a plan built by
//! [`build_farm_query`], enriched with driving distances from the requesting
//! user and, for `distance` sorts, re-ranked by those distances.
//!
//! # Example
//!
//! ```rust,no_run
//! use agrimap_farms::{FarmListingRequest, FarmsService, PgStore, SortBy};
//! use agrimap_maps::{DrivingDistances, GoogleMapsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> agrimap_core::Result<()> {
//!     let config = agrimap_core::config::Config::load(None)?;
//!     let store = Arc::new(PgStore::connect(&config.schema.database).await?);
//!     let maps = Arc::new(GoogleMapsClient::new().map_err(|e| e.into_integration_error("Google Maps"))?);
//!
//!     let service = FarmsService::new(
//!         store.clone(),
//!         store,
//!         DrivingDistances::new(maps.clone()),
//!         maps,
//!     );
//!     let request = FarmListingRequest::new(uuid::Uuid::nil(), 100).sorted_by(SortBy::Distance);
//!     for farm in service.list_farms(&request).await? {
//!         println!("{} {:.1} km", farm.name, farm.driving_distance);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod model;
pub mod query;
pub mod request;
pub mod seed;
pub mod service;
pub mod store;
pub mod users;

#[cfg(test)]
mod test_support;

pub use model::{CreateFarm, Farm, FarmListing, FarmRow, NewFarm, User};
pub use query::{build_farm_query, FarmQuery, PageWindow, YieldBounds, YieldFilter};
pub use request::{FarmListingRequest, FilterBy, ListingParams, SortBy, SortOrder};
pub use seed::{seed, SeedSummary};
pub use service::FarmsService;
pub use store::{FarmStore, MemoryStore, PgStore, UserStore};
pub use users::UsersService;
