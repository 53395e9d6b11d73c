//! In-memory store.

use super::{round_to_cents, FarmStore, UserStore};
use crate::model::{Farm, FarmRow, NewFarm, User};
use crate::query::{FarmQuery, OrderKey};
use crate::request::SortOrder;
use agrimap_core::{Error, Result};
use agrimap_geo::{planar_distance, Coordinate};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users and farms held in process memory.
///
/// Counts aggregate and listing fetches so callers can observe which
/// queries a request issued.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    farms: RwLock<Vec<Farm>>,
    average_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed user, keeping its id and timestamps.
    pub async fn add_user(&self, user: User) -> User {
        self.users.write().await.insert(user.id, user.clone());
        user
    }

    /// Insert a fully formed farm, keeping its id and timestamps.
    pub async fn add_farm(&self, farm: Farm) -> Farm {
        self.farms.write().await.push(farm.clone());
        farm
    }

    /// Number of `average_yield` calls so far.
    pub fn average_calls(&self) -> usize {
        self.average_calls.load(AtomicOrdering::Relaxed)
    }

    /// Number of `fetch_farms` calls so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(AtomicOrdering::Relaxed)
    }
}

fn compare(a: &Farm, b: &Farm, key: &OrderKey) -> Ordering {
    match key {
        OrderKey::Name => a.name.cmp(&b.name),
        OrderKey::CreatedAt => a.created_at.cmp(&b.created_at),
        OrderKey::DistanceFrom(origin) => planar_distance(&a.coordinates, origin)
            .total_cmp(&planar_distance(&b.coordinates, origin)),
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn average_yield(&self) -> Result<Option<f64>> {
        self.average_calls.fetch_add(1, AtomicOrdering::Relaxed);

        let farms = self.farms.read().await;
        if farms.is_empty() {
            return Ok(None);
        }

        let total: f64 = farms.iter().map(|f| f.crop_yield).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = total / farms.len() as f64;
        Ok(Some(round_to_cents(average)))
    }

    async fn fetch_farms(&self, query: &FarmQuery) -> Result<Vec<FarmRow>> {
        self.fetch_calls.fetch_add(1, AtomicOrdering::Relaxed);

        let users = self.users.read().await;
        let farms = self.farms.read().await;

        let mut matched: Vec<&Farm> = farms
            .iter()
            .filter(|f| query.yield_filter().is_none_or(|filter| filter.matches(f.crop_yield)))
            .collect();

        let ordering = query.ordering();
        matched.sort_by(|a, b| {
            let primary = compare(a, b, &ordering.key);
            let primary = match ordering.direction {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let window = query.window();
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|farm| {
                let owner = users
                    .get(&farm.user_id)
                    .ok_or_else(|| Error::storage(format!("farm {} has no owner", farm.id)))?;
                Ok(FarmRow {
                    id: farm.id,
                    user_id: farm.user_id,
                    name: farm.name.clone(),
                    address: farm.address.clone(),
                    size: farm.size,
                    crop_yield: farm.crop_yield,
                    created_at: farm.created_at,
                    coordinates: farm.coordinates,
                    owner_email: owner.email.clone(),
                })
            })
            .collect()
    }

    async fn insert_farm(&self, farm: NewFarm) -> Result<Farm> {
        if !self.users.read().await.contains_key(&farm.user_id) {
            return Err(Error::storage("farms.user_id violates foreign key constraint"));
        }

        let now = Utc::now();
        let farm = Farm {
            id: Uuid::new_v4(),
            user_id: farm.user_id,
            name: farm.name,
            address: farm.address,
            coordinates: farm.coordinates,
            size: farm.size,
            crop_yield: farm.crop_yield,
            created_at: now,
            updated_at: now,
        };
        Ok(self.add_farm(farm).await)
    }

    async fn count_farms(&self) -> Result<u64> {
        Ok(self.farms.read().await.len() as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, email: &str) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(Error::storage("users.email violates unique constraint"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            address: None,
            coordinates: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_location(
        &self,
        id: Uuid,
        address: &str,
        coordinates: Coordinate,
    ) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.address = Some(address.to_string());
            user.coordinates = Some(coordinates);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PageWindow, YieldBounds, YieldFilter};
    use crate::test_support::{farm, user};

    const ORIGIN: Coordinate = Coordinate {
        latitude: 55.0,
        longitude: 10.0,
    };

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        let owner = store.add_user(user("owner@agrimap.dk", Some(ORIGIN))).await;
        store.add_farm(farm(owner.id, "Cedar", 100.0, (55.3, 10.0), 2)).await;
        store.add_farm(farm(owner.id, "Aspen", 60.0, (55.1, 10.0), 3)).await;
        store.add_farm(farm(owner.id, "Birch", 140.0, (55.2, 10.0), 1)).await;
        store
    }

    async fn names(store: &MemoryStore, query: FarmQuery) -> Vec<String> {
        store
            .fetch_farms(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect()
    }

    #[tokio::test]
    async fn test_orderings() {
        let store = store().await;

        let by_name = FarmQuery::new().order_by(OrderKey::Name, SortOrder::Asc);
        assert_eq!(names(&store, by_name).await, ["Aspen", "Birch", "Cedar"]);

        let newest_first = FarmQuery::new().order_by(OrderKey::CreatedAt, SortOrder::Desc);
        assert_eq!(names(&store, newest_first).await, ["Aspen", "Cedar", "Birch"]);

        let farthest_first = FarmQuery::new().order_by(OrderKey::DistanceFrom(ORIGIN), SortOrder::Desc);
        assert_eq!(names(&store, farthest_first).await, ["Cedar", "Birch", "Aspen"]);
    }

    #[tokio::test]
    async fn test_window_and_filter() {
        let store = store().await;

        let second_page = FarmQuery::new().paginate(PageWindow::from_page(2, 2));
        assert_eq!(names(&store, second_page).await, ["Cedar"]);

        let empty_page = FarmQuery::new().paginate(PageWindow::from_page(1, 0));
        assert!(names(&store, empty_page).await.is_empty());

        let bounds = YieldBounds::from_average(100.0);
        let outliers = FarmQuery::new().with_yield_filter(YieldFilter::Outside(bounds));
        assert_eq!(names(&store, outliers).await, ["Aspen", "Birch"]);

        assert_eq!(store.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_average_yield() {
        let store = store().await;
        assert_eq!(store.average_yield().await.unwrap(), Some(100.0));
        assert_eq!(MemoryStore::new().average_yield().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_users() {
        let store = MemoryStore::new();
        let created = store.insert_user("a@agrimap.dk").await.unwrap();
        assert!(store.insert_user("a@agrimap.dk").await.is_err());

        let located = store
            .update_location(created.id, "Vesterbrogade 1", ORIGIN)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(located.coordinates, Some(ORIGIN));
        assert!(store.update_location(Uuid::new_v4(), "x", ORIGIN).await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
