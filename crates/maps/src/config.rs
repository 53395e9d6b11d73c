//! Configuration for the Maps client
//!
//! Built from the `[maps]` section of the service configuration or straight
//! from environment variables.

use crate::error::{MapsError, MapsResult};
use agrimap_core::config::MapsSection;
use agrimap_geo::DEFAULT_MAX_PER_BATCH;
use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Google Maps web services base URL
pub const DEFAULT_MAPS_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Client configuration
#[derive(Debug, Clone)]
pub struct MapsConfig {
    /// Base URL for the web services (no trailing `/`)
    pub base_url: String,
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Per-request timeout, also used as the per-batch timeout
    pub timeout: Duration,
    /// Destinations accepted by one distance-matrix call
    pub max_destinations_per_batch: NonZeroUsize,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAPS_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_destinations_per_batch: DEFAULT_MAX_PER_BATCH,
        }
    }
}

impl MapsConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `GOOGLE_MAPS_API_KEY`: API key (required by [`crate::GoogleMapsClient`])
    /// - `AGRIMAP_MAPS_URL`: Base URL override
    /// - `AGRIMAP_MAPS_TIMEOUT_MS`: Request timeout in milliseconds
    pub fn from_env() -> MapsResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("AGRIMAP_MAPS_URL") {
            config.base_url = url;
        }

        config.api_key = env::var("GOOGLE_MAPS_API_KEY").ok();

        if let Some(ms) = env::var("AGRIMAP_MAPS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from the `[maps]` section of the service config
    pub fn from_section(section: &MapsSection) -> MapsResult<Self> {
        let max_destinations_per_batch = NonZeroUsize::new(section.max_destinations_per_batch)
            .ok_or_else(|| MapsError::config("max_destinations_per_batch must be at least 1"))?;

        let config = Self {
            base_url: section.base_url.trim_end_matches('/').to_string(),
            api_key: section.api_key.clone(),
            timeout: Duration::from_millis(section.timeout_ms),
            max_destinations_per_batch,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the destination cap per call
    #[must_use]
    pub fn with_max_destinations_per_batch(mut self, max: NonZeroUsize) -> Self {
        self.max_destinations_per_batch = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> MapsResult<()> {
        if self.base_url.is_empty() {
            return Err(MapsError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(MapsError::InvalidUrl(self.base_url.clone()));
        }

        if self.timeout.is_zero() {
            return Err(MapsError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapsConfig::default();
        assert_eq!(config.base_url, DEFAULT_MAPS_URL);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.max_destinations_per_batch.get(), 25);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_section() {
        let section = MapsSection {
            api_key: Some("key".into()),
            base_url: "http://localhost:8089/maps/api/".into(),
            timeout_ms: 250,
            max_destinations_per_batch: 10,
        };

        let config = MapsConfig::from_section(&section).unwrap();
        assert_eq!(config.base_url, "http://localhost:8089/maps/api");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.max_destinations_per_batch.get(), 10);
    }

    #[test]
    fn test_from_section_rejects_zero_cap() {
        let section = MapsSection {
            max_destinations_per_batch: 0,
            ..MapsSection::default()
        };
        assert!(matches!(MapsConfig::from_section(&section), Err(MapsError::Config(_))));
    }

    #[test]
    fn test_builder_pattern() {
        let config = MapsConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_api_key("abc")
            .with_timeout(Duration::from_millis(500));

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_validation() {
        assert!(MapsConfig::default().validate().is_ok());
        assert!(MapsConfig::default().with_base_url("").validate().is_err());
        assert!(matches!(
            MapsConfig::default().with_base_url("ftp://maps").validate(),
            Err(MapsError::InvalidUrl(_))
        ));
        assert!(MapsConfig::default().with_timeout(Duration::ZERO).validate().is_err());
    }
}
