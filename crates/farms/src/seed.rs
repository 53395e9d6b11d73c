//! Deterministic sample data for local development.
//!
//! Five located users in Danish cities, each owning ten farms laid out on a
//! grid over Jutland and Funen. Running the seed twice is a no-op.

use crate::model::NewFarm;
use crate::store::{round_to_cents, FarmStore, UserStore};
use agrimap_core::Result;
use agrimap_geo::Coordinate;
use serde::Serialize;
use tracing::{info, warn};

pub const FARMS_PER_USER: usize = 10;

const LAT_RANGE: (f64, f64) = (54.57, 56.75);
const LNG_RANGE: (f64, f64) = (8.07, 11.13);
const SIZE_RANGE: (f64, f64) = (45.0, 500.0);
const YIELD_RANGE: (f64, f64) = (45.0, 400.0);

/// (email, address, latitude, longitude)
const USERS: [(&str, &str, f64, f64); 5] = [
    ("anders@agrimap.dk", "Rådhuspladsen 1, 1550 København", 55.6761, 12.5683),
    ("birgitte@agrimap.dk", "Rådhuspladsen 2, 8000 Aarhus", 56.1572, 10.2107),
    ("carsten@agrimap.dk", "Flakhaven 2, 5000 Odense", 55.3959, 10.3883),
    ("dorte@agrimap.dk", "Boulevarden 13, 9000 Aalborg", 57.0488, 9.9217),
    ("erik@agrimap.dk", "Torvegade 74, 6700 Esbjerg", 55.4765, 8.4594),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub farms: usize,
    /// Users already existed; nothing was written.
    pub skipped: bool,
}

/// Insert the sample users and farms unless any user exists.
pub async fn seed(users: &dyn UserStore, farms: &dyn FarmStore) -> Result<SeedSummary> {
    let existing = users.count_users().await?;
    if existing > 0 {
        warn!(existing, "Users already present, skipping seed");
        return Ok(SeedSummary {
            users: 0,
            farms: 0,
            skipped: true,
        });
    }

    let total = USERS.len() * FARMS_PER_USER;
    let mut inserted = 0;

    for (u, (email, address, lat, lng)) in USERS.iter().enumerate() {
        let user = users.insert_user(email).await?;
        users
            .update_location(user.id, address, Coordinate::new(*lat, *lng))
            .await?;

        for n in 0..FARMS_PER_USER {
            let index = u * FARMS_PER_USER + n;
            farms.insert_farm(sample_farm(user.id, index, total)).await?;
            inserted += 1;
        }
    }

    info!(users = USERS.len(), farms = inserted, "Seeded sample data");
    Ok(SeedSummary {
        users: USERS.len(),
        farms: inserted,
        skipped: false,
    })
}

/// The `index`-th of `total` sample farms.
fn sample_farm(user_id: uuid::Uuid, index: usize, total: usize) -> NewFarm {
    let rows = FARMS_PER_USER;
    let cols = total.div_ceil(rows).max(1);

    let latitude = spread(LAT_RANGE, index % rows, rows);
    let longitude = spread(LNG_RANGE, index / rows, cols);
    // Strided so neighbouring farms differ in size and yield.
    let size = spread(SIZE_RANGE, (index * 37) % total, total);
    let crop_yield = spread(YIELD_RANGE, (index * 23) % total, total);

    NewFarm {
        user_id,
        name: format!("Farm {}", index + 1),
        address: format!("Landevej {}, Danmark", index + 1),
        coordinates: Coordinate::new(latitude, longitude),
        size,
        crop_yield,
    }
}

/// Position `step` of `steps` evenly spaced values over `range`, inclusive.
#[allow(clippy::cast_precision_loss)]
fn spread((low, high): (f64, f64), step: usize, steps: usize) -> f64 {
    if steps <= 1 {
        return low;
    }
    round_to_cents(low + (high - low) * step as f64 / (steps - 1) as f64)
}
