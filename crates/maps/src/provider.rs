//! Provider seams used by the services.

use crate::client::{GoogleMapsClient, PROVIDER_NAME};
use crate::error::MapsResult;
use agrimap_geo::Coordinate;
use async_trait::async_trait;

/// A distance-matrix provider answering one origin row per call.
#[async_trait]
pub trait DistanceMatrix: Send + Sync {
    /// Name used in integration errors, e.g. `"Google Maps"`.
    fn provider_name(&self) -> &str;

    /// Driving distance in meters from `origin` to each destination, in
    /// order. `None` where the provider has no distance for a destination.
    async fn distance_row(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
    ) -> MapsResult<Vec<Option<u64>>>;
}

/// Resolves free-form addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Name used in integration errors.
    fn provider_name(&self) -> &str;

    /// First match for `address`, or `None` when nothing matches.
    async fn geocode(&self, address: &str) -> MapsResult<Option<Coordinate>>;
}

#[async_trait]
impl DistanceMatrix for GoogleMapsClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn distance_row(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
    ) -> MapsResult<Vec<Option<u64>>> {
        self.distance_matrix()
            .row(origin, destinations)
            .await?
            .into_first_row_meters(destinations.len())
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn geocode(&self, address: &str) -> MapsResult<Option<Coordinate>> {
        self.geocoding().lookup(address).await?.first_location()
    }
}
