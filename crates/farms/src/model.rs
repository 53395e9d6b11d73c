//! Domain model: stored users and farms, creation input and listing output.

use agrimap_geo::Coordinate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub address: Option<String>,
    /// Unset until the user's location has been geocoded.
    pub coordinates: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinate,
    /// Hectares
    pub size: f64,
    /// Tons
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Farm creation input as supplied by a caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarm {
    pub name: String,
    pub address: String,
    pub size: f64,
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    /// `lat,long`; geocoded from `address` when absent.
    #[serde(default)]
    pub coordinates: Option<String>,
}

/// A farm ready for insertion, coordinates resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFarm {
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinate,
    pub size: f64,
    pub crop_yield: f64,
}

/// One row of the listing projection: a farm joined with its owner's email.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    pub size: f64,
    pub crop_yield: f64,
    pub created_at: DateTime<Utc>,
    pub coordinates: Coordinate,
    pub owner_email: String,
}

/// A listing entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmListing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
    /// Owner email
    pub owner: String,
    pub size: f64,
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    /// Kilometres from the requester, 0 when the provider had no route
    pub driving_distance: f64,
    #[serde(serialize_with = "serialize_iso8601")]
    pub created_at: DateTime<Utc>,
}

impl FarmListing {
    /// Project a storage row, attaching its driving distance.
    pub fn from_row(row: FarmRow, driving_distance: f64) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            address: row.address,
            owner: row.owner_email,
            size: row.size,
            crop_yield: row.crop_yield,
            driving_distance,
            created_at: row.created_at,
        }
    }
}

/// `2023-12-13T09:30:00.000Z`
fn serialize_iso8601<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> FarmRow {
        FarmRow {
            id: Uuid::nil(),
            user_id: Uuid::from_u128(7),
            name: "Hedegaard".into(),
            address: "Skovvej 12, 8600 Silkeborg".into(),
            size: 120.5,
            crop_yield: 85.2,
            created_at: Utc.with_ymd_and_hms(2023, 12, 13, 9, 30, 0).unwrap(),
            coordinates: Coordinate::new(56.17, 9.55),
            owner_email: "owner@agrimap.dk".into(),
        }
    }

    #[test]
    fn test_listing_serialization() {
        let listing = FarmListing::from_row(row(), 42.195);
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["userId"], "00000000-0000-0000-0000-000000000007");
        assert_eq!(json["owner"], "owner@agrimap.dk");
        assert_eq!(json["yield"], 85.2);
        assert_eq!(json["drivingDistance"], 42.195);
        assert_eq!(json["createdAt"], "2023-12-13T09:30:00.000Z");
        assert!(json.get("coordinates").is_none());
    }

    #[test]
    fn test_create_farm_deserialize() {
        let input: CreateFarm = serde_json::from_str(
            r#"{"name": "Farm 1", "address": "Nørrebro, Copenhagen, Denmark", "size": 100.3, "yield": 90.4}"#,
        )
        .unwrap();

        assert_eq!(input.crop_yield, 90.4);
        assert!(input.coordinates.is_none());
    }
}
