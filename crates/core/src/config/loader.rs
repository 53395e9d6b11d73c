//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults, then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let mut config = Self {
            schema,
            path: config_path,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Override file values from environment-style lookups.
    ///
    /// Recognised keys: `DATABASE_URL`, `GOOGLE_MAPS_API_KEY`,
    /// `AGRIMAP_MAPS_URL`, `AGRIMAP_MAPS_TIMEOUT_MS`, `AGRIMAP_LOG`.
    ///
    /// A timeout that is not a whole number of milliseconds is an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.schema.database.url = url;
        }
        if let Some(key) = lookup("GOOGLE_MAPS_API_KEY") {
            self.schema.maps.api_key = Some(key);
        }
        if let Some(url) = lookup("AGRIMAP_MAPS_URL") {
            self.schema.maps.base_url = url;
        }
        if let Some(ms) = lookup("AGRIMAP_MAPS_TIMEOUT_MS") {
            self.schema.maps.timeout_ms = ms.trim().parse().map_err(|_| {
                Error::invalid_config_value(
                    "AGRIMAP_MAPS_TIMEOUT_MS",
                    format!("timeout must be a whole number of milliseconds, got `{ms}`"),
                )
            })?;
        }
        if let Some(level) = lookup("AGRIMAP_LOG") {
            self.schema.logging.level = level;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let schema = &self.schema;

        if schema.database.url.trim().is_empty() {
            return Err(Error::invalid_config_value("database.url", "database url cannot be empty"));
        }

        let maps_url = &schema.maps.base_url;
        if !maps_url.starts_with("http://") && !maps_url.starts_with("https://") {
            return Err(Error::invalid_config_value(
                "maps.base_url",
                "maps base_url must start with http:// or https://",
            ));
        }

        if schema.maps.timeout_ms == 0 {
            return Err(Error::invalid_config_value("maps.timeout_ms", "timeout cannot be zero"));
        }

        if schema.maps.max_destinations_per_batch == 0 {
            return Err(Error::invalid_config_value(
                "maps.max_destinations_per_batch",
                "batch cap must be at least 1",
            ));
        }

        if schema.listing.default_page_size > schema.listing.max_page_size {
            return Err(Error::invalid_config_value(
                "listing.default_page_size",
                "default page size cannot exceed max_page_size",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Defaults only (no file, no environment)
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["agrimap.toml", ".agrimap.toml", ".config/agrimap.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("While parsing config file {}", path))
    })
}
