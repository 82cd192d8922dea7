use super::models::Config;
use crate::humanize::ByteSize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Longest line the reader may be configured to accept
const MAX_LINE_BYTES_LIMIT: ByteSize = ByteSize::mib(64);

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("app.name must not be empty")]
    EmptyAppName,

    #[error("app.timeout_secs must be positive")]
    ZeroTimeout,

    #[error("pool.queue_capacity must be positive")]
    ZeroQueueCapacity,

    #[error("io.max_line_bytes must be between 1B and {limit}, got {actual}")]
    InvalidMaxLineBytes { actual: ByteSize, limit: ByteSize },

    #[error("Invalid logging.level '{level}': {reason}")]
    InvalidLogLevel { level: String, reason: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_app(config)?;
    validate_logging(config)?;
    validate_pool(config)?;
    validate_io(config)?;
    Ok(())
}

fn validate_app(config: &Config) -> Result<(), ValidationError> {
    if config.app.name.trim().is_empty() {
        return Err(ValidationError::EmptyAppName);
    }

    if config.app.timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout);
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    EnvFilter::try_new(&config.logging.level).map_err(|e| ValidationError::InvalidLogLevel {
        level: config.logging.level.clone(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Worker counts are normalised by the pool itself, only the queue needs a floor
fn validate_pool(config: &Config) -> Result<(), ValidationError> {
    if config.pool.queue_capacity == 0 {
        return Err(ValidationError::ZeroQueueCapacity);
    }

    Ok(())
}

fn validate_io(config: &Config) -> Result<(), ValidationError> {
    let actual = config.io.max_line_bytes;
    if actual.as_u64() == 0 || actual > MAX_LINE_BYTES_LIMIT {
        return Err(ValidationError::InvalidMaxLineBytes {
            actual,
            limit: MAX_LINE_BYTES_LIMIT,
        });
    }

    Ok(())
}
