//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so an empty file is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the logger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level accepted by the logger (trace, debug, info, warn, error).
    pub level: String,

    /// Console output settings.
    pub console: ConsoleConfig,

    /// List store settings.
    pub store: StoreConfig,

    /// Operational logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            console: ConsoleConfig::default(),
            store: StoreConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Console sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Write records to stdout.
    pub enabled: bool,

    /// Colorize the level tag with ANSI escapes.
    pub colorize: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colorize: true,
        }
    }
}

/// List store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Persist records and allow paginated reads.
    pub enabled: bool,

    /// Name of the list holding the entries.
    pub key: String,

    /// Minimum level persisted by the list sink.
    pub level: String,

    /// Bound on each store call in milliseconds (0 = unbounded).
    pub op_timeout_ms: u64,

    /// Entries the list sink buffers for its writer before rejecting writes.
    pub queue_capacity: usize,

    /// Fail logger construction when the store cannot be reached, instead of
    /// falling back to console-only logging.
    pub require_connection: bool,

    /// Connection options. Without them no store handle is created.
    pub connection: Option<StoreConnectionConfig>,
}

impl StoreConfig {
    pub fn op_timeout(&self) -> Option<Duration> {
        (self.op_timeout_ms > 0).then(|| Duration::from_millis(self.op_timeout_ms))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: "logs:errors".to_string(),
            level: "error".to_string(),
            op_timeout_ms: 0,
            queue_capacity: 10_000,
            require_connection: false,
            connection: None,
        }
    }
}

/// Store connection options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Logical database index.
    pub db: i64,
    /// Bound on the initial connection, including its retries.
    pub connect_timeout_ms: u64,
    /// Reconnect attempts made by the client after a failed connection.
    pub connect_retries: usize,
}

impl StoreConnectionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for StoreConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            db: 0,
            connect_timeout_ms: 5_000,
            connect_retries: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter for the operational subscriber (overridden by RUST_LOG).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
