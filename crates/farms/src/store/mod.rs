//! Storage seams.
//!
//! Services talk to storage through [`FarmStore`] and [`UserStore`]; the
//! Postgres implementation backs the binary and the in-memory one backs
//! tests and local experiments.

pub mod memory;
pub mod postgres;

use crate::model::{Farm, FarmRow, NewFarm, User};
use crate::query::FarmQuery;
use agrimap_core::Result;
use agrimap_geo::Coordinate;
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Mean yield over all farms, rounded to 2 decimals. `None` when there
    /// are no farms.
    async fn average_yield(&self) -> Result<Option<f64>>;

    /// Execute a fetch plan: filtered, ordered, paginated farm/owner rows.
    async fn fetch_farms(&self, query: &FarmQuery) -> Result<Vec<FarmRow>>;

    async fn insert_farm(&self, farm: NewFarm) -> Result<Farm>;

    async fn count_farms(&self) -> Result<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn insert_user(&self, email: &str) -> Result<User>;

    /// Set address and coordinates; `None` if the user does not exist.
    async fn update_location(
        &self,
        id: Uuid,
        address: &str,
        coordinates: Coordinate,
    ) -> Result<Option<User>>;

    async fn count_users(&self) -> Result<u64>;
}

/// Round half away from zero to 2 decimals, as `ROUND(x::numeric, 2)` does.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
