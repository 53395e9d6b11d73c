//! Geocoding endpoint

use crate::client::GoogleMapsClient;
use crate::error::{MapsError, MapsResult};
use agrimap_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Geocoding API interface
#[derive(Clone)]
pub struct GeocodeApi {
    client: GoogleMapsClient,
}

impl GeocodeApi {
    /// Create a new geocoding API interface
    pub(crate) fn new(client: GoogleMapsClient) -> Self {
        Self { client }
    }

    /// GET geocode/json for a free-form address
    pub async fn lookup(&self, address: &str) -> MapsResult<GeocodeResponse> {
        let query = [("address", address.to_string())];
        self.client.get("geocode/json", &query).await
    }
}

/// Geocoding response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    /// Top-level status
    pub status: String,
    /// Provider explanation for non-OK statuses
    #[serde(default)]
    pub error_message: Option<String>,
    /// Candidate matches, best first
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// A single geocoding match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Normalised address
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Location geometry
    pub geometry: Geometry,
}

/// Result geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    /// Point location
    pub location: LatLng,
}

/// Latitude/longitude pair as the provider spells it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl GeocodeResponse {
    /// Location of the first result.
    ///
    /// `ZERO_RESULTS` and an empty result list give `None`; any other
    /// non-OK status is an error.
    pub fn first_location(self) -> MapsResult<Option<Coordinate>> {
        match self.status.as_str() {
            "OK" => Ok(self
                .results
                .first()
                .map(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng))),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(MapsError::status(self.status, self.error_message)),
        }
    }
}
