//! Logging setup and in-process metrics

pub mod metrics;

pub use metrics::{Counter, Gauge, MetricsSnapshot, ServiceMetrics, Timer};

use crate::config::{LogFormat, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG`, when set and valid, takes precedence over `config.level`.
/// Timestamps are UTC RFC 3339.
///
/// # Errors
///
/// Returns [`ObservabilityError::AlreadyInstalled`] on every call after the
/// first; the existing subscriber stays in place.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339());

    let installed = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| ObservabilityError::AlreadyInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected_before_install() {
        // RUST_LOG would override the configured level
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let config = LoggingConfig {
            level: "workpool=loud".to_string(),
            format: LogFormat::Pretty,
        };
        assert!(matches!(
            init_tracing(&config),
            Err(ObservabilityError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_second_install_reports_error() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(ObservabilityError::AlreadyInstalled(_)) | Err(ObservabilityError::InvalidFilter(_))
        ));
    }
}
