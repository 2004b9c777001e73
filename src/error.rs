//! Error taxonomy for the logger.
//!
//! Write-path failures are reported on the operational target and never
//! reach application code. Read-path failures propagate as [`LogError`].

use thiserror::Error;

use crate::record::ParseLevelError;
use crate::store::StoreError;

/// Errors surfaced by the public logger API.
#[derive(Debug, Error)]
pub enum LogError {
    /// Store access was requested while the store is disabled.
    #[error("{0}")]
    Precondition(String),

    /// The store is enabled but no live handle exists.
    #[error("{0}")]
    StoreUnavailable(String),

    /// A push, length or range call failed at the store.
    #[error("store operation failed: {0}")]
    StoreOperation(#[from] StoreError),

    /// Page and limit must both be at least 1.
    #[error("invalid page request: page={page}, limit={limit}")]
    InvalidPage { page: u64, limit: u64 },

    /// A configured level name could not be parsed.
    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),

    /// An entry could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A background writer was requested outside a Tokio runtime.
    #[error("no async runtime available: {0}")]
    Runtime(String),
}

/// Result type for logger operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors returned by a single sink write.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize entry: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink's background writer has stopped.
    #[error("sink is closed")]
    Closed,

    /// The writer queue is at capacity; the entry was not accepted.
    #[error("sink queue is full ({capacity} entries)")]
    Full { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LogError::Precondition("store must be enabled to fetch logs".to_string());
        assert_eq!(err.to_string(), "store must be enabled to fetch logs");

        let err = LogError::InvalidPage { page: 0, limit: 10 };
        assert!(err.to_string().contains("page=0"));

        let err = LogError::from(StoreError::Timeout(250));
        assert!(err.to_string().contains("250 ms"));

        let err = SinkError::Full { capacity: 8 };
        assert_eq!(err.to_string(), "sink queue is full (8 entries)");
    }
}
