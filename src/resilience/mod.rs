//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store call (push / length / range / connect):
//!     → timeouts.rs (optional bounded wait)
//!     → StoreError::Timeout on expiry
//! ```
//!
//! # Design Decisions
//! - Store calls are never retried here; retry belongs to the store client
//! - A timed-out read fails the whole page request

pub mod timeouts;
