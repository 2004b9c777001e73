//! List-backed store subsystem.
//!
//! # Data Flow
//! ```text
//! ListSink (writer task)
//!     → push(key, entry)          prepend, newest first
//!
//! PageReader
//!     → length(key)   ┐ joined
//!     → range(key, start, end) ┘
//!
//! RedisStore connection lifecycle
//!     → events.rs (broadcast of ConnectionEvent)
//!     → reporter task → operational log target
//! ```
//!
//! # Design Decisions
//! - Each call is atomic at the store; no locking is layered on top
//! - `length` and `range` are not consistent with each other across calls
//! - Any list-capable backend satisfies [`ListStore`]

pub mod events;
pub mod memory;
pub mod redis_store;
pub mod types;

use async_trait::async_trait;

pub use events::{ConnectionEvent, ConnectionEvents};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use types::{StoreError, StoreResult};

/// Ordered list operations on a key-addressed store.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Prepend `value` to the list at `key`, returning the new length.
    async fn push(&self, key: &str, value: String) -> StoreResult<u64>;

    /// Current number of elements at `key` (0 when absent).
    async fn length(&self, key: &str) -> StoreResult<u64>;

    /// Elements `start..=end`, newest first. Negative indices count from
    /// the tail; out-of-range bounds are clamped.
    async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>>;
}
