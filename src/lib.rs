//! Structured logging into a list-backed store.
//!
//! # Architecture Overview
//!
//! ```text
//!   Logger::log / tracing event (SinkLayer)
//!        │
//!        ▼
//!   level filter ──▶ ConsoleSink ──▶ stdout
//!        │
//!        └─────────▶ ListSink ──▶ writer task ──▶ ListStore::push (newest first)
//!
//!   Logger::paginated(page, limit)
//!        └─▶ PageReader ──▶ ListStore::length ┐ joined ──▶ Page
//!                           ListStore::range  ┘
//! ```
//!
//! The store is the only shared medium between writers and readers. Store
//! connection lifecycle events flow on their own channel to the operational
//! log target.

pub mod config;
pub mod entry;
pub mod error;
pub mod layer;
pub mod logger;
pub mod observability;
pub mod reader;
pub mod record;
pub mod resilience;
pub mod sink;
pub mod store;

pub use config::schema::LoggerConfig;
pub use entry::PersistedEntry;
pub use error::{LogError, LogResult, SinkError};
pub use layer::SinkLayer;
pub use logger::Logger;
pub use reader::{Page, PageReader};
pub use record::{Level, LogRecord};
pub use sink::{ConsoleSink, ListSink, LogSink};
pub use store::{ListStore, MemoryStore, RedisStore};
