//! Log sinks.
//!
//! # Data Flow
//! ```text
//! Logger::log(record)
//!     → level filter (logger minimum)
//!     → for each sink: level filter (sink minimum) → sink.write(&record)
//!
//! ListSink::write
//!     → PersistedEntry (entry.rs) → JSON line
//!     → writer channel → background task → ListStore::push
//! ```
//!
//! # Design Decisions
//! - A sink is anything implementing [`LogSink`]; there is no base type
//! - `write` returning is the completion signal
//! - The list sink acknowledges once the push is issued, not when it lands

pub mod console;
pub mod list;

use crate::error::SinkError;
use crate::record::{Level, LogRecord};

pub use console::ConsoleSink;
pub use list::ListSink;

/// A destination for log records.
pub trait LogSink: Send + Sync {
    /// Short name used in operational reports and metrics labels.
    fn name(&self) -> &str;

    /// Least severe level this sink accepts.
    fn min_level(&self) -> Level;

    /// Record one entry. Must not block on remote I/O.
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}
