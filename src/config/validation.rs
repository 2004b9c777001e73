//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check level names, store key and connection options
//! - Check the metrics address when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::LoggerConfig;
use crate::record::Level;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.level.parse::<Level>().is_err() {
        errors.push(ValidationError::new(
            "level",
            format!("unknown level {:?}", config.level),
        ));
    }
    if config.store.level.parse::<Level>().is_err() {
        errors.push(ValidationError::new(
            "store.level",
            format!("unknown level {:?}", config.store.level),
        ));
    }
    if config.store.key.trim().is_empty() {
        errors.push(ValidationError::new("store.key", "must not be empty"));
    }
    if config.store.queue_capacity == 0 {
        errors.push(ValidationError::new("store.queue_capacity", "must be non-zero"));
    }

    if let Some(connection) = &config.store.connection {
        if connection.host.trim().is_empty() {
            errors.push(ValidationError::new("store.connection.host", "must not be empty"));
        }
        if connection.port == 0 {
            errors.push(ValidationError::new("store.connection.port", "must be non-zero"));
        }
        if connection.db < 0 {
            errors.push(ValidationError::new("store.connection.db", "must not be negative"));
        }
        if connection.connect_timeout_ms == 0 {
            errors.push(ValidationError::new(
                "store.connection.connect_timeout_ms",
                "must be non-zero",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid address {:?}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
