//! Wiring from configuration to services.

use agrimap_core::config::Config;
use agrimap_core::{Error, Result};
use agrimap_farms::{FarmsService, PgStore, UsersService};
use agrimap_maps::{DrivingDistances, GoogleMapsClient, MapsConfig, MapsError};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub store: Arc<PgStore>,
}

impl App {
    /// Open the database pool.
    pub async fn connect(config: Config) -> Result<Self> {
        let store = PgStore::connect(&config.schema.database).await?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn maps(&self) -> Result<Arc<GoogleMapsClient>> {
        let config = MapsConfig::from_section(&self.config.schema.maps).map_err(maps_config_error)?;
        let client = GoogleMapsClient::with_config(config).map_err(maps_config_error)?;
        Ok(Arc::new(client))
    }

    pub fn farms(&self) -> Result<FarmsService> {
        let maps = self.maps()?;
        let distances = DrivingDistances::from_config(maps.clone(), maps.config());
        Ok(FarmsService::new(
            self.store.clone(),
            self.store.clone(),
            distances,
            maps,
        ))
    }

    pub fn users(&self) -> Result<UsersService> {
        Ok(UsersService::new(self.store.clone(), self.maps()?))
    }
}

fn maps_config_error(err: MapsError) -> Error {
    Error::config(err.to_string())
        .with_suggestion("Set GOOGLE_MAPS_API_KEY or maps.api_key in agrimap.toml")
}
