//! Error types for the Maps client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Maps operations
pub type MapsResult<T> = Result<T, MapsError>;

/// Maps client errors
#[derive(Error, Debug)]
pub enum MapsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Non-2xx HTTP response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// 2xx response whose top-level `status` is not `OK`
    #[error("Provider status {status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// Provider status, e.g. `REQUEST_DENIED`
        status: String,
        /// Provider `error_message`, when present
        message: Option<String>,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Body parsed but does not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl MapsError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a provider status error
    pub fn status(status: impl Into<String>, message: Option<String>) -> Self {
        Self::Status {
            status: status.into(),
            message,
        }
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Wrap into the service-level provider integration error.
    #[must_use]
    pub fn into_integration_error(self, provider: &str) -> agrimap_core::Error {
        let detail = self.to_string();
        agrimap_core::Error::provider_integration(provider)
            .with_context(detail)
            .with_source(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimap_core::ErrorCode;

    #[test]
    fn test_status_display() {
        let err = MapsError::status("REQUEST_DENIED", Some("The provided API key is invalid.".into()));
        assert_eq!(
            err.to_string(),
            "Provider status REQUEST_DENIED: The provided API key is invalid."
        );
        assert_eq!(MapsError::status("OVER_QUERY_LIMIT", None).to_string(), "Provider status OVER_QUERY_LIMIT");
    }

    #[test]
    fn test_into_integration_error() {
        let err = MapsError::Timeout(Duration::from_secs(1)).into_integration_error("Google Maps");
        assert_eq!(err.code, ErrorCode::ProviderIntegration);
        assert_eq!(err.message, "Google Maps Integration Error");
        assert!(err.context.is_some());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_client_error_classification() {
        assert!(MapsError::api_response(403, "forbidden").is_client_error());
        assert!(!MapsError::api_response(503, "unavailable").is_client_error());
    }
}
