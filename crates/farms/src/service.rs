//! Farm listing and creation.

use crate::model::{CreateFarm, Farm, FarmListing, NewFarm};
use crate::query::build_farm_query;
use crate::request::{FarmListingRequest, SortBy, SortOrder};
use crate::store::{FarmStore, UserStore};
use agrimap_core::validation::Validator;
use agrimap_core::{Error, Result};
use agrimap_geo::{to_storage, Coordinate};
use agrimap_maps::{DrivingDistances, Geocoder};
use agrimap_telemetry::{metrics, MetricsRegistry, Timer};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Ranks farms by driving distance from the requesting user.
#[derive(Clone)]
pub struct FarmsService {
    farms: Arc<dyn FarmStore>,
    users: Arc<dyn UserStore>,
    distances: DrivingDistances,
    geocoder: Arc<dyn Geocoder>,
    metrics: &'static MetricsRegistry,
}

impl FarmsService {
    pub fn new(
        farms: Arc<dyn FarmStore>,
        users: Arc<dyn UserStore>,
        distances: DrivingDistances,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            farms,
            users,
            distances,
            geocoder,
            metrics: metrics(),
        }
    }

    /// Record counters into `registry` instead of the process-wide one.
    #[must_use]
    pub fn with_metrics(mut self, registry: &'static MetricsRegistry) -> Self {
        self.metrics = registry;
        self
    }

    /// One page of farms, each with its driving distance from the requester.
    ///
    /// Fails with `UnprocessableEntity` before touching the farm table when
    /// the requester has no coordinates. For `distance` sorts the page is
    /// re-ordered by driving distance.
    #[instrument(skip(self), fields(user_id = %request.user_id))]
    pub async fn list_farms(&self, request: &FarmListingRequest) -> Result<Vec<FarmListing>> {
        let timer = Timer::start("farms.list");
        self.metrics.increment("farms.list.requests");

        let user = self
            .users
            .find_user(request.user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", request.user_id))?;
        let origin = user
            .coordinates
            .ok_or_else(|| Error::unprocessable_entity("User coordinates are not set"))?;

        let query = build_farm_query(self.farms.as_ref(), &origin, request).await?;
        let rows = self.farms.fetch_farms(&query).await?;

        if rows.is_empty() {
            self.metrics.increment("farms.list.empty");
            info!(rows = 0, "No farms matched");
            return Ok(Vec::new());
        }

        let destinations: Vec<Coordinate> = rows.iter().map(|r| r.coordinates).collect();
        let distances = self
            .distances
            .get_driving_distances(&origin, &destinations)
            .await?;
        self.metrics.increment_by(
            "maps.distance.batches",
            u64::try_from(self.distances.batch_count(destinations.len())).unwrap_or(u64::MAX),
        );

        let mut listings: Vec<FarmListing> = rows
            .into_iter()
            .zip(distances)
            .map(|(row, km)| FarmListing::from_row(row, km))
            .collect();

        if request.sort_by == SortBy::Distance {
            sort_by_driving_distance(&mut listings, request.sort_order);
        }

        let elapsed = timer.stop();
        info!(
            rows = listings.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Listed farms"
        );
        Ok(listings)
    }

    /// Validate and store a new farm for `user_id`.
    ///
    /// Without explicit coordinates the address is geocoded; an address the
    /// provider cannot place is rejected.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_farm(&self, user_id: Uuid, input: CreateFarm) -> Result<Farm> {
        Validator::new()
            .required("name", &input.name)
            .required("address", &input.address)
            .finite_non_negative("size", input.size)
            .finite_non_negative("yield", input.crop_yield)
            .validate()
            .to_result()?;

        if self.users.find_user(user_id).await?.is_none() {
            return Err(Error::not_found("User", user_id));
        }

        let coordinates = match input.coordinates.as_deref() {
            Some(text) => to_storage(text)?.coordinate(),
            None => self
                .geocoder
                .geocode(&input.address)
                .await
                .map_err(|e| e.into_integration_error(self.geocoder.provider_name()))?
                .ok_or_else(|| Error::unprocessable_entity("Invalid address"))?,
        };

        let farm = self
            .farms
            .insert_farm(NewFarm {
                user_id,
                name: input.name,
                address: input.address,
                coordinates,
                size: input.size,
                crop_yield: input.crop_yield,
            })
            .await?;

        info!(farm_id = %farm.id, "Created farm");
        Ok(farm)
    }
}

/// Stable sort by driving distance.
fn sort_by_driving_distance(listings: &mut [FarmListing], order: SortOrder) {
    listings.sort_by(|a, b| {
        let ordering = a.driving_distance.total_cmp(&b.driving_distance);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
