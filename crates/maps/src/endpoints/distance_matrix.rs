//! Distance Matrix endpoint
//!
//! One origin against many destinations, driving mode.

use crate::client::GoogleMapsClient;
use crate::error::{MapsError, MapsResult};
use agrimap_geo::{to_display, Coordinate};
use serde::{Deserialize, Serialize};

/// Distance Matrix API interface
#[derive(Clone)]
pub struct DistanceMatrixApi {
    client: GoogleMapsClient,
}

impl DistanceMatrixApi {
    /// Create a new distance-matrix API interface
    pub(crate) fn new(client: GoogleMapsClient) -> Self {
        Self { client }
    }

    /// GET distancematrix/json for a single origin row
    pub async fn row(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
    ) -> MapsResult<DistanceMatrixResponse> {
        let query = [
            ("origins", to_display(origin)),
            ("destinations", join_destinations(destinations)),
            ("mode", "driving".to_string()),
        ];
        self.client.get("distancematrix/json", &query).await
    }
}

/// Destinations as the provider expects them: `lat,long|lat,long|...`
pub fn join_destinations(destinations: &[Coordinate]) -> String {
    destinations
        .iter()
        .map(to_display)
        .collect::<Vec<_>>()
        .join("|")
}

/// Distance Matrix response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Top-level status, `OK` on success
    pub status: String,
    /// Provider explanation for non-OK statuses
    #[serde(default)]
    pub error_message: Option<String>,
    /// Resolved origin addresses
    #[serde(default)]
    pub origin_addresses: Vec<String>,
    /// Resolved destination addresses
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    /// One row per origin
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// One origin's results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRow {
    /// One element per destination, in request order
    pub elements: Vec<MatrixElement>,
}

/// One origin/destination pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixElement {
    /// Element status, e.g. `OK`, `NOT_FOUND`, `ZERO_RESULTS`
    pub status: String,
    /// Driving distance
    #[serde(default)]
    pub distance: Option<TextValue>,
    /// Driving duration
    #[serde(default)]
    pub duration: Option<TextValue>,
}

/// Human text plus machine value (meters or seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    /// Display text, e.g. `"12.3 km"`
    pub text: String,
    /// Numeric value
    pub value: u64,
}

impl DistanceMatrixResponse {
    /// Distances in meters for the first row, one entry per destination.
    ///
    /// Elements that are not `OK` or carry no distance yield `None`.
    /// A non-OK top-level status or an element count different from
    /// `expected` is an error.
    pub fn into_first_row_meters(self, expected: usize) -> MapsResult<Vec<Option<u64>>> {
        if self.status != "OK" {
            return Err(MapsError::status(self.status, self.error_message));
        }

        let row = self
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| MapsError::malformed("response has no rows"))?;

        if row.elements.len() != expected {
            return Err(MapsError::malformed(format!(
                "expected {expected} elements, got {}",
                row.elements.len()
            )));
        }

        Ok(row
            .elements
            .into_iter()
            .map(|element| match element.status.as_str() {
                "OK" => element.distance.map(|d| d.value),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_FIXTURE: &str = r#"{
        "destination_addresses": ["Aarhus, Denmark", "Unknown", "Odense, Denmark"],
        "origin_addresses": ["Copenhagen, Denmark"],
        "rows": [{
            "elements": [
                {
                    "distance": { "text": "187 km", "value": 187332 },
                    "duration": { "text": "2 hours 5 mins", "value": 7493 },
                    "status": "OK"
                },
                { "status": "NOT_FOUND" },
                {
                    "distance": { "text": "166 km", "value": 165871 },
                    "duration": { "text": "1 hour 42 mins", "value": 6127 },
                    "status": "OK"
                }
            ]
        }],
        "status": "OK"
    }"#;

    #[test]
    fn test_response_deserialize() {
        let response: DistanceMatrixResponse = serde_json::from_str(OK_FIXTURE).unwrap();
        assert_eq!(response.status, "OK");
        assert_eq!(response.rows[0].elements.len(), 3);
        assert_eq!(response.destination_addresses[0], "Aarhus, Denmark");
    }

    #[test]
    fn test_first_row_meters() {
        let response: DistanceMatrixResponse = serde_json::from_str(OK_FIXTURE).unwrap();
        let meters = response.into_first_row_meters(3).unwrap();
        assert_eq!(meters, vec![Some(187_332), None, Some(165_871)]);
    }

    #[test]
    fn test_element_count_mismatch() {
        let response: DistanceMatrixResponse = serde_json::from_str(OK_FIXTURE).unwrap();
        assert!(matches!(
            response.into_first_row_meters(25),
            Err(MapsError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_denied() {
        let json = r#"{
            "destination_addresses": [],
            "error_message": "The provided API key is invalid.",
            "origin_addresses": [],
            "rows": [],
            "status": "REQUEST_DENIED"
        }"#;

        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();
        match response.into_first_row_meters(1) {
            Err(MapsError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_join_destinations() {
        let destinations = [
            Coordinate::new(56.1629, 10.2039),
            Coordinate::new(55.4038, 10.4024),
        ];
        assert_eq!(
            join_destinations(&destinations),
            "56.1629,10.2039|55.4038,10.4024"
        );
    }
}
