//! Operational logging setup.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log filter configurable via config and RUST_LOG
//! - Output goes to stderr so stdout stays free for command output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::layer::SinkLayer;

/// Install the global subscriber.
///
/// `default_filter` applies when RUST_LOG is unset. When `sink_layer` is
/// given, application `tracing` events are also forwarded to the logger's
/// sinks. Returns `false` if a global subscriber was already installed.
pub fn init(default_filter: &str, sink_layer: Option<SinkLayer>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sink_layer)
        .try_init()
        .is_ok()
}
