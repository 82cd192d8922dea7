use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub io: IoConfig,
}

impl Config {
    /// Address a listener for this app would bind to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.app.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.app.timeout_secs)
    }
}

/// Application identity and network settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub enable_tls: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            enable_tls: false,
        }
    }
}

fn default_app_name() -> String {
    "workpool".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    5
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `workpool=debug,warn`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Worker pool sizing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Worker count; values `<= 0` run a single worker
    #[serde(default = "default_workers")]
    pub workers: i64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_workers() -> i64 {
    4
}

fn default_queue_capacity() -> usize {
    crate::pool::DEFAULT_QUEUE_CAPACITY
}

/// Line reader limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IoConfig {
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: ByteSize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

fn default_max_line_bytes() -> ByteSize {
    ByteSize::mib(1)
}
