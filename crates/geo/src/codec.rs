//! Coordinate codec between display text and the stored point form.
//!
//! Supports:
//! - Display text: `lat,long` (optional whitespace around each component)
//! - Decorated storage text: `(lat,long)` or `(lat, long)`
//! - Structured pairs: `{"x": lat, "y": long}`

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point value as it comes back from storage or a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointValue {
    /// Structured pair: {"x": lat, "y": long}
    Pair {
        /// Latitude
        x: f64,
        /// Longitude
        y: f64,
    },
    /// Text, with or without parenthesis decoration
    Text(String),
}

impl PointValue {
    /// Normalize either input shape into a coordinate.
    pub fn to_coordinate(&self) -> Result<Coordinate> {
        match self {
            PointValue::Pair { x, y } => checked(*x, *y),
            PointValue::Text(text) => parse_lat_long(text),
        }
    }

    /// Normalize and render as `lat,long`.
    pub fn to_display(&self) -> Result<String> {
        self.to_coordinate().map(|coord| to_display(&coord))
    }
}

/// The storage form of a coordinate; renders as the point literal `(lat, long)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredPoint(Coordinate);

impl StoredPoint {
    /// The wrapped coordinate.
    pub fn coordinate(&self) -> Coordinate {
        self.0
    }
}

impl fmt::Display for StoredPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.latitude, self.0.longitude)
    }
}

impl From<Coordinate> for StoredPoint {
    fn from(coord: Coordinate) -> Self {
        Self(coord)
    }
}

impl From<StoredPoint> for Coordinate {
    fn from(point: StoredPoint) -> Self {
        point.0
    }
}

/// Convert `lat,long` text into the stored point form.
///
/// # Errors
/// Returns [`GeoError::InvalidCoordinateFormat`] unless the input holds
/// exactly two numeric components, and [`GeoError::InvalidCoordinate`] when
/// they fall outside the latitude/longitude ranges.
///
/// # Example
/// ```
/// use agrimap_geo::to_storage;
///
/// let point = to_storage(" 55.67, 12.58 ").unwrap();
/// assert_eq!(point.to_string(), "(55.67, 12.58)");
/// assert!(to_storage("55.67").is_err());
/// ```
pub fn to_storage(lat_long: &str) -> Result<StoredPoint> {
    parse_lat_long(lat_long).map(StoredPoint)
}

/// Render a coordinate as `lat,long` for external use.
pub fn to_display(coord: &Coordinate) -> String {
    coord.to_string()
}

fn parse_lat_long(input: &str) -> Result<Coordinate> {
    let inner = strip_parentheses(input.trim());
    let parts: Vec<&str> = inner.split(',').collect();

    if parts.len() != 2 {
        return Err(GeoError::InvalidCoordinateFormat(format!(
            "Expected `lat,long`, got: {input}"
        )));
    }

    let lat = parse_component(parts[0], input)?;
    let lng = parse_component(parts[1], input)?;

    checked(lat, lng)
}

fn strip_parentheses(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text)
        .trim()
}

fn parse_component(part: &str, input: &str) -> Result<f64> {
    part.trim()
        .parse::<f64>()
        .map_err(|_| GeoError::InvalidCoordinateFormat(format!("Invalid number `{}` in: {input}", part.trim())))
}

fn checked(lat: f64, lng: f64) -> Result<Coordinate> {
    let coord = Coordinate::new(lat, lng);
    if !coord.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!(
            "{lat},{lng} is outside latitude ±90 / longitude ±180"
        )));
    }
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_to_storage_wraps_in_parentheses() {
        let point = to_storage("55.67087112646539, 12.582277381808696").unwrap();
        assert_eq!(point.to_string(), "(55.67087112646539, 12.582277381808696)");
    }

    #[test]
    fn test_to_storage_rejects_wrong_arity() {
        assert!(matches!(
            to_storage("55.67"),
            Err(GeoError::InvalidCoordinateFormat(_))
        ));
        assert!(matches!(
            to_storage("1,2,3"),
            Err(GeoError::InvalidCoordinateFormat(_))
        ));
        assert!(matches!(
            to_storage(""),
            Err(GeoError::InvalidCoordinateFormat(_))
        ));
    }

    #[test]
    fn test_to_storage_rejects_non_numeric() {
        assert!(matches!(
            to_storage("north,12.5"),
            Err(GeoError::InvalidCoordinateFormat(_))
        ));
        assert!(matches!(
            to_storage("NaN,12.5"),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_to_storage_rejects_out_of_range() {
        assert!(to_storage("90,180").is_ok());
        assert!(to_storage("-90,-180").is_ok());
        assert!(matches!(
            to_storage("91,0"),
            Err(GeoError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            to_storage("500,900"),
            Err(GeoError::InvalidCoordinate(_))
        ));

        let pair = PointValue::Pair { x: 45.0, y: -181.0 };
        assert!(matches!(pair.to_coordinate(), Err(GeoError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_decorated_text_is_stripped() {
        let value = PointValue::Text("(55.5,10.25)".to_string());
        assert_eq!(value.to_display().unwrap(), "55.5,10.25");
    }

    #[test]
    fn test_structured_pair_matches_text_path() {
        let pair: PointValue = serde_json::from_value(json!({"x": 55.5, "y": 10.25})).unwrap();
        let text: PointValue = serde_json::from_value(json!("(55.5, 10.25)")).unwrap();

        assert!(matches!(pair, PointValue::Pair { .. }));
        assert_eq!(pair.to_coordinate().unwrap(), text.to_coordinate().unwrap());
        assert_eq!(pair.to_display().unwrap(), "55.5,10.25");
    }

    #[test]
    fn test_negative_coordinates() {
        let coord = to_storage("-33.8688,-151.2093").unwrap().coordinate();
        assert!((coord.latitude - (-33.8688)).abs() < 1e-9);
        assert!((coord.longitude - (-151.2093)).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn round_trip_preserves_components(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            let text = format!("{lat},{lng}");
            let coord: Coordinate = to_storage(&text).unwrap().into();
            let back = to_storage(&to_display(&coord)).unwrap().coordinate();

            prop_assert!((back.latitude - lat).abs() < 1e-9);
            prop_assert!((back.longitude - lng).abs() < 1e-9);
        }
    }
}
