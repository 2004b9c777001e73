//! Metrics collection and exposition.
//!
//! # Metrics
//! - `list_logger_entries_enqueued_total` (counter): entries handed to the writer
//! - `list_logger_entries_pushed_total` (counter): entries acknowledged by the store
//! - `list_logger_push_failures_total` (counter): entries dropped after a failed push
//! - `list_logger_sink_failures_total` (counter): failed sink writes by sink
//! - `list_logger_pages_served_total` (counter): successful page reads
//! - `list_logger_page_fetch_seconds` (histogram): page read latency
//! - `list_logger_store_connection_state` (gauge): 1=ready, 0=closed

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::observability::OPS_TARGET;

/// Install the Prometheus exporter. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(target: OPS_TARGET, address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(target: OPS_TARGET, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_enqueued() {
    counter!("list_logger_entries_enqueued_total").increment(1);
}

pub fn record_push() {
    counter!("list_logger_entries_pushed_total").increment(1);
}

pub fn record_push_failure() {
    counter!("list_logger_push_failures_total").increment(1);
}

pub fn record_sink_failure(sink: &str) {
    counter!("list_logger_sink_failures_total", "sink" => sink.to_string()).increment(1);
}

pub fn record_page_served(elapsed: Duration) {
    counter!("list_logger_pages_served_total").increment(1);
    histogram!("list_logger_page_fetch_seconds").record(elapsed.as_secs_f64());
}

pub fn record_connection_state(ready: bool) {
    gauge!("list_logger_store_connection_state").set(if ready { 1.0 } else { 0.0 });
}
