//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Store lifecycle, failed pushes, failed sink writes
//!     → tracing events on OPS_TARGET (operational log stream)
//!     → logging.rs subscriber (stderr)
//!
//! Writer task, reader, sinks
//!     → metrics.rs (counters, gauges, histograms)
//!     → Prometheus endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Operational events never enter the persisted list
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

/// Target of every operational event emitted by this crate.
pub const OPS_TARGET: &str = "list_logger::ops";
