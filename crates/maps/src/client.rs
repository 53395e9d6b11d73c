//! Google Maps HTTP client

use crate::config::MapsConfig;
use crate::endpoints::{DistanceMatrixApi, GeocodeApi};
use crate::error::{MapsError, MapsResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Provider name used in integration errors
pub const PROVIDER_NAME: &str = "Google Maps";

/// Google Maps web services client
///
/// Wraps `reqwest` and adds the API key, a request timeout and a request
/// correlation ID recorded on the tracing span.
#[derive(Clone)]
pub struct GoogleMapsClient {
    inner: Client,
    config: Arc<MapsConfig>,
}

impl GoogleMapsClient {
    /// Create a new client with configuration from environment
    pub fn new() -> MapsResult<Self> {
        let config = MapsConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: MapsConfig) -> MapsResult<Self> {
        config.validate()?;

        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(MapsError::missing_env("GOOGLE_MAPS_API_KEY"));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("agrimap-maps/1.0"));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(MapsError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &MapsConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access distance-matrix endpoints
    #[must_use]
    pub fn distance_matrix(&self) -> DistanceMatrixApi {
        DistanceMatrixApi::new(self.clone())
    }

    /// Access geocoding endpoints
    #[must_use]
    pub fn geocoding(&self) -> GeocodeApi {
        GeocodeApi::new(self.clone())
    }

    /// Perform a GET request against `{base_url}/{path}` with the API key appended
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> MapsResult<T> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let key = self.config.api_key.as_deref().unwrap_or_default();

        let start = Instant::now();
        let result = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, &request_id)
            .query(query)
            .query(&[("key", key)])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(request_id = %request_id, url = %url, "Request timed out");
                return Err(MapsError::Timeout(self.config.timeout));
            }
            Err(e) => {
                warn!(request_id = %request_id, url = %url, error = %e, "Request failed");
                return Err(MapsError::Request(e));
            }
        };

        let value = self.handle_response(response).await;
        debug!(
            request_id = %request_id,
            elapsed_ms = start.elapsed().as_millis(),
            ok = value.is_ok(),
            "Request completed"
        );
        value
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> MapsResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(MapsError::Json)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(MapsError::api_response(status.as_u16(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = MapsConfig::default().with_api_key("test-key");
        let client = GoogleMapsClient::with_config(config).unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_MAPS_URL);
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = GoogleMapsClient::with_config(MapsConfig::default());
        assert!(matches!(result, Err(MapsError::MissingEnvVar(var)) if var == "GOOGLE_MAPS_API_KEY"));
    }
}
