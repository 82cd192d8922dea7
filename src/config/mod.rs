//! Configuration management for workpool
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. `.env` file
//! 4. Environment variables
//!
//! # Usage
//!
//! ```no_run
//! use workpool::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Pool workers: {}", config.pool.workers);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `WORKPOOL__<section>__<key>`:
//! - `WORKPOOL__POOL__WORKERS=8`
//! - `WORKPOOL__LOGGING__LEVEL=debug`
//! - `WORKPOOL__IO__MAX_LINE_BYTES=4MB`
//!
//! # Configuration File
//!
//! Read from `config/workpool.toml` unless `WORKPOOL_CONFIG` points elsewhere.
//! A missing file is not an error.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{AppConfig, Config, IoConfig, LogFormat, LoggingConfig, PoolConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a source is malformed or a value has the wrong type
    /// - validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path plus environment overrides
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = sources::load_from_str(toml)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path consulted by [`Config::load`]
    pub fn default_path() -> std::path::PathBuf {
        sources::config_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[pool]\nworkers = 2\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.pool.workers, 2);
        assert_eq!(config.app.name, "workpool");
    }

    #[test]
    fn test_validation_catches_zero_capacity() {
        let result = Config::from_toml("[pool]\nqueue_capacity = 0\n");

        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        let result = Config::from_toml("[app]\nport = \"eighty\"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.pool.workers = 3;
        config.io.max_line_bytes = ByteSize::kib(64);

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("max_line_bytes = \"64KB\""));

        let reparsed = Config::from_toml(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
