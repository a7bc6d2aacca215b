//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_API_BASE_URL: &str = "http://10.0.2.2:5124/api";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub store_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_vars(
            std::env::var("API_BASE_URL").ok(),
            std::env::var("STORE_PATH").ok(),
            std::env::var("RUST_LOG").ok(),
        )
    }

    pub(crate) fn from_vars(
        api_base_url: Option<String>,
        store_path: Option<String>,
        log_level: Option<String>,
    ) -> Result<Self, ConfigError> {
        // --- Remote Service ---
        let api_base_url = api_base_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }

        // --- Local Storage ---
        let store_path = store_path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./storyteller-store.json"));

        // --- Logging ---
        let log_level_str = log_level.unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            store_path,
            log_level,
        })
    }
}
