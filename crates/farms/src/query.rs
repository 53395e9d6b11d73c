//! Farm fetch plans.
//!
//! A [`FarmQuery`] is an immutable description of one listing fetch: an
//! optional yield predicate, an ordering and a page window. Stores execute
//! it; [`build_farm_query`] derives it from a listing request.

use crate::request::{FarmListingRequest, FilterBy, SortBy, SortOrder};
use crate::store::FarmStore;
use agrimap_core::Result;
use agrimap_geo::Coordinate;
use tracing::debug;

/// Band around the average yield outside which a farm is an outlier.
const OUTLIER_LOWER: f64 = 0.7;
const OUTLIER_UPPER: f64 = 1.3;

/// Inclusive yield band derived from the average yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldBounds {
    pub average: f64,
    pub lower: f64,
    pub upper: f64,
}

impl YieldBounds {
    pub fn from_average(average: f64) -> Self {
        Self {
            average,
            lower: average * OUTLIER_LOWER,
            upper: average * OUTLIER_UPPER,
        }
    }

    /// `lower <= value <= upper`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Yield predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldFilter {
    /// Strictly below `lower` or strictly above `upper`.
    Outside(YieldBounds),
    /// Between `lower` and `upper`, inclusive.
    Within(YieldBounds),
}

impl YieldFilter {
    pub fn bounds(&self) -> YieldBounds {
        match self {
            YieldFilter::Outside(bounds) | YieldFilter::Within(bounds) => *bounds,
        }
    }

    pub fn matches(&self, crop_yield: f64) -> bool {
        match self {
            YieldFilter::Outside(bounds) => !bounds.contains(crop_yield),
            YieldFilter::Within(bounds) => bounds.contains(crop_yield),
        }
    }
}

/// What a fetch is ordered by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderKey {
    Name,
    CreatedAt,
    /// Geometric distance between the farm and this point.
    DistanceFrom(Coordinate),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarmOrdering {
    pub key: OrderKey,
    pub direction: SortOrder,
}

impl Default for FarmOrdering {
    fn default() -> Self {
        Self {
            key: OrderKey::Name,
            direction: SortOrder::Asc,
        }
    }
}

/// OFFSET/LIMIT pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Window for a 1-based page. Page 0 is treated as page 1.
    pub fn from_page(page: u32, size: u32) -> Self {
        Self {
            offset: u64::from(page.saturating_sub(1)) * u64::from(size),
            limit: u64::from(size),
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::from_page(1, 100)
    }
}

/// An immutable fetch plan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FarmQuery {
    yield_filter: Option<YieldFilter>,
    ordering: FarmOrdering,
    window: PageWindow,
}

impl FarmQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_yield_filter(mut self, filter: YieldFilter) -> Self {
        self.yield_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn order_by(mut self, key: OrderKey, direction: SortOrder) -> Self {
        self.ordering = FarmOrdering { key, direction };
        self
    }

    #[must_use]
    pub fn paginate(mut self, window: PageWindow) -> Self {
        self.window = window;
        self
    }

    pub fn yield_filter(&self) -> Option<&YieldFilter> {
        self.yield_filter.as_ref()
    }

    pub fn ordering(&self) -> &FarmOrdering {
        &self.ordering
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }
}

/// Derive the fetch plan for `request`, with `origin` as the requester's
/// location.
///
/// Issues one aggregate query for the average yield when the outlier filter
/// is requested; an empty farm table averages to 0.
pub async fn build_farm_query(
    store: &dyn FarmStore,
    origin: &Coordinate,
    request: &FarmListingRequest,
) -> Result<FarmQuery> {
    let mut query = FarmQuery::new().paginate(PageWindow::from_page(request.page, request.size));

    if let Some(FilterBy::Outliers(keep_outliers)) = request.filter {
        let average = store.average_yield().await?.unwrap_or(0.0);
        let bounds = YieldBounds::from_average(average);
        debug!(average, lower = bounds.lower, upper = bounds.upper, "Yield bounds");

        query = query.with_yield_filter(if keep_outliers {
            YieldFilter::Outside(bounds)
        } else {
            YieldFilter::Within(bounds)
        });
    }

    let key = match request.sort_by {
        SortBy::Name => OrderKey::Name,
        SortBy::Date => OrderKey::CreatedAt,
        SortBy::Distance => OrderKey::DistanceFrom(*origin),
    };

    Ok(query.order_by(key, request.sort_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{farm, user};
    use proptest::prelude::*;
    use uuid::Uuid;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 55.6761,
        longitude: 12.5683,
    };

    async fn scenario_store() -> MemoryStore {
        let store = MemoryStore::new();
        let owner = store.add_user(user("owner@agrimap.dk", Some(ORIGIN))).await;
        for (name, y) in [("Alpha", 85.2), ("Bravo", 45.76), ("Charlie", 180.5)] {
            store.add_farm(farm(owner.id, name, y, (56.0, 10.0), 0)).await;
        }
        store
    }

    #[test]
    fn test_bounds_from_average() {
        let bounds = YieldBounds::from_average(103.82);
        assert!((bounds.lower - 72.674).abs() < 1e-9);
        assert!((bounds.upper - 134.966).abs() < 1e-9);
        assert!(bounds.contains(bounds.lower));
        assert!(bounds.contains(bounds.upper));
    }

    #[test]
    fn test_page_window() {
        assert_eq!(PageWindow::from_page(1, 100), PageWindow { offset: 0, limit: 100 });
        assert_eq!(PageWindow::from_page(3, 10), PageWindow { offset: 20, limit: 10 });
        assert_eq!(PageWindow::from_page(5, 0), PageWindow { offset: 0, limit: 0 });
    }

    proptest! {
        #[test]
        fn prop_filters_partition_yields(average in 0.0f64..1000.0, crop_yield in 0.0f64..2000.0) {
            let bounds = YieldBounds::from_average(average);
            let outside = YieldFilter::Outside(bounds).matches(crop_yield);
            let within = YieldFilter::Within(bounds).matches(crop_yield);
            prop_assert!(outside != within);
        }
    }

    #[tokio::test]
    async fn test_outlier_scenario() {
        let store = scenario_store().await;
        let request = FarmListingRequest::new(Uuid::nil(), 100).outliers(false);

        let query = build_farm_query(&store, &ORIGIN, &request).await.unwrap();
        let bounds = query.yield_filter().unwrap().bounds();
        assert!((bounds.average - 103.82).abs() < 1e-9);
        assert_eq!(store.average_calls(), 1);

        let within: Vec<f64> = store
            .fetch_farms(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.crop_yield)
            .collect();
        assert_eq!(within, vec![85.2]);

        let request = request.outliers(true);
        let query = build_farm_query(&store, &ORIGIN, &request).await.unwrap();
        let outside: Vec<f64> = store
            .fetch_farms(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.crop_yield)
            .collect();
        assert_eq!(outside, vec![45.76, 180.5]);
    }

    #[tokio::test]
    async fn test_no_filter_skips_aggregate() {
        let store = scenario_store().await;
        let request = FarmListingRequest::new(Uuid::nil(), 100).sorted_by(SortBy::Distance);

        let query = build_farm_query(&store, &ORIGIN, &request).await.unwrap();

        assert_eq!(store.average_calls(), 0);
        assert!(query.yield_filter().is_none());
        assert_eq!(query.ordering().key, OrderKey::DistanceFrom(ORIGIN));
        assert_eq!(query.ordering().direction, SortOrder::Asc);
    }

    #[tokio::test]
    async fn test_date_ordering_defaults_desc() {
        let store = MemoryStore::new();
        let request = FarmListingRequest::new(Uuid::nil(), 10).sorted_by(SortBy::Date).page(2, 10);

        let query = build_farm_query(&store, &ORIGIN, &request).await.unwrap();

        assert_eq!(query.ordering().key, OrderKey::CreatedAt);
        assert_eq!(query.ordering().direction, SortOrder::Desc);
        assert_eq!(query.window(), PageWindow { offset: 10, limit: 10 });
    }
}
