// ABOUTME: Server configuration read from the environment
// ABOUTME: Port, bind host, database location and CORS origin with legacy fallbacks

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use airwatch_config as keys;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// `None` means the default under `~/.airwatch`
    pub database_path: Option<PathBuf>,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `AIRWATCH_*` names win over legacy ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_of = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let port = match first_of(&[keys::AIRWATCH_PORT, keys::PORT]) {
            Some(raw) => raw.parse::<u16>()?,
            None => keys::DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = first_of(&[keys::AIRWATCH_HOST]).unwrap_or_else(|| keys::DEFAULT_HOST.to_string());
        let database_path = first_of(&[keys::AIRWATCH_DATABASE_PATH]).map(PathBuf::from);
        let cors_origin = first_of(&[keys::AIRWATCH_CORS_ORIGIN, keys::CORS_ORIGIN])
            .unwrap_or_else(|| keys::DEFAULT_CORS_ORIGIN.to_string());

        Ok(Config {
            port,
            host,
            database_path,
            cors_origin,
        })
    }
}
