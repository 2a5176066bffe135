use std::{env, path::PathBuf, time::Duration};

use bus2go::refresh::RefreshConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server settings, read from `BUS2GO_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub favourites_path: PathBuf,
    /// Where downloaded GTFS feeds are kept.
    pub data_dir: PathBuf,
    pub port: u16,
    pub refresh: RefreshConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/bus2go.db"),
            favourites_path: PathBuf::from("data/favourites.json"),
            data_dir: PathBuf::from("data/feeds"),
            port: 3000,
            refresh: RefreshConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = env::var("BUS2GO_DB") {
            config.database_path = value.into();
        }
        if let Ok(value) = env::var("BUS2GO_FAVOURITES") {
            config.favourites_path = value.into();
        }
        if let Ok(value) = env::var("BUS2GO_DATA_DIR") {
            config.data_dir = value.into();
        }
        if let Ok(value) = env::var("BUS2GO_PORT") {
            config.port = value.parse().map_err(|_| ConfigError::Invalid {
                name: "BUS2GO_PORT",
                value,
            })?;
        }
        if let Ok(value) = env::var("BUS2GO_REFRESH_MS") {
            let millis: u64 = value.parse().map_err(|_| ConfigError::Invalid {
                name: "BUS2GO_REFRESH_MS",
                value: value.clone(),
            })?;
            if millis == 0 {
                return Err(ConfigError::Invalid {
                    name: "BUS2GO_REFRESH_MS",
                    value,
                });
            }
            config.refresh.interval = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
