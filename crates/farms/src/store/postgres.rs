//! Postgres store.
//!
//! Points are written from their storage literal (`$n::point`) and read back
//! as `coordinates::text`, then decoded by the coordinate codec.

use super::{FarmStore, UserStore};
use crate::model::{Farm, FarmRow, NewFarm, User};
use crate::query::{FarmQuery, OrderKey, YieldFilter};
use agrimap_core::config::DatabaseConfig;
use agrimap_core::{Error, Result};
use agrimap_geo::{Coordinate, PointValue, StoredPoint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, email, address, coordinates::text AS coordinates, created_at, updated_at";

const FARM_COLUMNS: &str = "id, user_id, name, address, coordinates::text AS coordinates, \
     size, yield AS crop_yield, created_at, updated_at";

const LISTING_SELECT: &str = "SELECT farm.id, farm.user_id, farm.name, farm.address, farm.size, \
     farm.yield AS crop_yield, farm.created_at, farm.coordinates::text AS coordinates, \
     owner.email AS owner_email \
     FROM farms farm \
     JOIN users owner ON owner.id = farm.user_id";

fn storage_error(err: sqlx::Error) -> Error {
    warn!(error = %err, "Storage query failed");
    Error::storage(format!("Database error: {err}")).with_source(err)
}

fn decode_point(text: &str) -> Result<Coordinate> {
    PointValue::Text(text.to_string())
        .to_coordinate()
        .map_err(|e| Error::storage(format!("Unreadable point {text:?}")).with_source(e))
}

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    address: Option<String>,
    coordinates: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = Error;

    fn try_from(r: UserRecord) -> Result<Self> {
        Ok(User {
            id: r.id,
            email: r.email,
            address: r.address,
            coordinates: r.coordinates.as_deref().map(decode_point).transpose()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(FromRow)]
struct FarmRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    address: String,
    coordinates: String,
    size: f64,
    crop_yield: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FarmRecord> for Farm {
    type Error = Error;

    fn try_from(r: FarmRecord) -> Result<Self> {
        Ok(Farm {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            address: r.address,
            coordinates: decode_point(&r.coordinates)?,
            size: r.size,
            crop_yield: r.crop_yield,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ListingRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    address: String,
    size: f64,
    crop_yield: f64,
    created_at: DateTime<Utc>,
    coordinates: String,
    owner_email: String,
}

impl TryFrom<ListingRecord> for FarmRow {
    type Error = Error;

    fn try_from(r: ListingRecord) -> Result<Self> {
        Ok(FarmRow {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            address: r.address,
            size: r.size,
            crop_yield: r.crop_yield,
            created_at: r.created_at,
            coordinates: decode_point(&r.coordinates)?,
            owner_email: r.owner_email,
        })
    }
}

/// Postgres-backed store sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool using the `[database]` settings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| storage_error(e).with_suggestion("Check DATABASE_URL and that Postgres is running"))?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::storage(format!("Migration failed: {e}")).with_source(e))
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(storage_error)
    }
}

/// Append the WHERE/ORDER BY/OFFSET/LIMIT clauses for `query`.
fn push_plan(builder: &mut QueryBuilder<'_, Postgres>, query: &FarmQuery) {
    match query.yield_filter() {
        Some(YieldFilter::Outside(bounds)) => {
            builder
                .push(" WHERE (farm.yield < ")
                .push_bind(bounds.lower)
                .push(" OR farm.yield > ")
                .push_bind(bounds.upper)
                .push(")");
        }
        Some(YieldFilter::Within(bounds)) => {
            builder
                .push(" WHERE farm.yield BETWEEN ")
                .push_bind(bounds.lower)
                .push(" AND ")
                .push_bind(bounds.upper);
        }
        None => {}
    }

    let ordering = query.ordering();
    match ordering.key {
        OrderKey::Name => {
            builder.push(" ORDER BY farm.name ");
        }
        OrderKey::CreatedAt => {
            builder.push(" ORDER BY farm.created_at ");
        }
        OrderKey::DistanceFrom(origin) => {
            builder
                .push(" ORDER BY farm.coordinates <-> point(")
                .push_bind(origin.latitude)
                .push(", ")
                .push_bind(origin.longitude)
                .push(") ");
        }
    }
    builder.push(ordering.direction.as_sql()).push(", farm.id ASC");

    let window = query.window();
    builder
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
        .push(" LIMIT ")
        .push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX));
}

#[async_trait]
impl FarmStore for PgStore {
    async fn average_yield(&self) -> Result<Option<f64>> {
        sqlx::query_scalar("SELECT ROUND(AVG(farm.yield)::numeric, 2)::float8 FROM farms farm")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn fetch_farms(&self, query: &FarmQuery) -> Result<Vec<FarmRow>> {
        let mut builder = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        push_plan(&mut builder, query);
        debug!(sql = builder.sql(), "Fetching farms");

        let records: Vec<ListingRecord> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        records.into_iter().map(FarmRow::try_from).collect()
    }

    async fn insert_farm(&self, farm: NewFarm) -> Result<Farm> {
        let sql = format!(
            "INSERT INTO farms (user_id, name, address, coordinates, size, yield) \
             VALUES ($1, $2, $3, $4::point, $5, $6) RETURNING {FARM_COLUMNS}"
        );

        let record: FarmRecord = sqlx::query_as(&sql)
            .bind(farm.user_id)
            .bind(&farm.name)
            .bind(&farm.address)
            .bind(StoredPoint::from(farm.coordinates).to_string())
            .bind(farm.size)
            .bind(farm.crop_yield)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        Farm::try_from(record)
    }

    async fn count_farms(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farms")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let record: Option<UserRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        record.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let record: Option<UserRecord> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        record.map(User::try_from).transpose()
    }

    async fn insert_user(&self, email: &str) -> Result<User> {
        let sql = format!("INSERT INTO users (email) VALUES ($1) RETURNING {USER_COLUMNS}");
        let record: UserRecord = sqlx::query_as(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        User::try_from(record)
    }

    async fn update_location(
        &self,
        id: Uuid,
        address: &str,
        coordinates: Coordinate,
    ) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET address = $2, coordinates = $3::point, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let record: Option<UserRecord> = sqlx::query_as(&sql)
            .bind(id)
            .bind(address)
            .bind(StoredPoint::from(coordinates).to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        record.map(User::try_from).transpose()
    }

    async fn count_users(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
