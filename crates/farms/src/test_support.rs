//! Fixtures and provider stubs shared by unit tests.

use crate::model::{Farm, User};
use agrimap_geo::Coordinate;
use agrimap_maps::{DistanceMatrix, Geocoder, MapsError, MapsResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 13, 9, 0, 0).unwrap()
}

pub fn user(email: &str, coordinates: Option<Coordinate>) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        address: coordinates.map(|_| "Rådhuspladsen 1, København".to_string()),
        coordinates,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// A farm created `minutes` after [`epoch`].
pub fn farm(owner: Uuid, name: &str, crop_yield: f64, (lat, lng): (f64, f64), minutes: i64) -> Farm {
    Farm {
        id: Uuid::new_v4(),
        user_id: owner,
        name: name.to_string(),
        address: format!("{name} Landevej 1"),
        coordinates: Coordinate::new(lat, lng),
        size: 100.0,
        crop_yield,
        created_at: epoch() + Duration::minutes(minutes),
        updated_at: epoch() + Duration::minutes(minutes),
    }
}

/// Distance matrix answering from a fixed table of meters keyed by
/// destination latitude (bit pattern); unknown destinations have no route.
#[derive(Default)]
pub struct StubMatrix {
    pub meters: HashMap<u64, u64>,
    pub fail: bool,
    calls: AtomicUsize,
}

impl StubMatrix {
    pub fn with_route(mut self, destination_lat: f64, meters: u64) -> Self {
        self.meters.insert(destination_lat.to_bits(), meters);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DistanceMatrix for StubMatrix {
    fn provider_name(&self) -> &str {
        "Google Maps"
    }

    async fn distance_row(
        &self,
        _origin: &Coordinate,
        destinations: &[Coordinate],
    ) -> MapsResult<Vec<Option<u64>>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(MapsError::status("REQUEST_DENIED", None));
        }
        Ok(destinations
            .iter()
            .map(|d| self.meters.get(&d.latitude.to_bits()).copied())
            .collect())
    }
}

/// Geocoder backed by a fixed address book.
#[derive(Default)]
pub struct StubGeocoder {
    pub book: HashMap<String, Coordinate>,
    pub fail: bool,
}

impl StubGeocoder {
    pub fn with(mut self, address: &str, coordinates: Coordinate) -> Self {
        self.book.insert(address.to_string(), coordinates);
        self
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    fn provider_name(&self) -> &str {
        "Google Maps"
    }

    async fn geocode(&self, address: &str) -> MapsResult<Option<Coordinate>> {
        if self.fail {
            return Err(MapsError::status("OVER_QUERY_LIMIT", None));
        }
        Ok(self.book.get(address).copied())
    }
}
