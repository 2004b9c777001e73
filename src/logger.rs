//! The logger: composes sinks and serves paginated reads.
//!
//! # Responsibilities
//! - Build the console and list sinks from configuration
//! - Filter records by level and dispatch them to every sink
//! - Keep sink failures away from the calling code
//! - Serve pages from the persisted list

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::LoggerConfig;
use crate::error::{LogError, LogResult};
use crate::layer::SinkLayer;
use crate::observability::{metrics, OPS_TARGET};
use crate::reader::Page;
use crate::record::{Level, LogRecord};
use crate::sink::{ConsoleSink, ListSink, LogSink};
use crate::store::events::spawn_reporter;
use crate::store::{ConnectionEvents, ListStore, RedisStore};

/// Shared handle to a configured logger. Clones share sinks and store.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    config: LoggerConfig,
    level: Level,
    sinks: ArcSwap<Vec<Arc<dyn LogSink>>>,
    list_sink: Option<Arc<ListSink>>,
}

impl Logger {
    /// Build a logger over an existing store handle.
    ///
    /// A list sink is created only when the store is enabled and `store` is
    /// given. Creating a list sink outside a Tokio runtime fails with
    /// [`LogError::Runtime`].
    pub fn new(config: LoggerConfig, store: Option<Arc<dyn ListStore>>) -> LogResult<Self> {
        let level: Level = config.level.parse()?;
        let mut sinks: Vec<Arc<dyn LogSink>> = Vec::new();

        if config.console.enabled {
            sinks.push(Arc::new(ConsoleSink::new(level, config.console.colorize)));
        }

        let list_sink = match store {
            Some(store) if config.store.enabled => {
                let store_level: Level = config.store.level.parse()?;
                let sink = Arc::new(ListSink::new(
                    store,
                    config.store.key.clone(),
                    store_level,
                    config.store.queue_capacity,
                )?);
                sinks.push(sink.clone());
                Some(sink)
            }
            _ => None,
        };

        tracing::debug!(
            target: OPS_TARGET,
            level = %level,
            sinks = sinks.len(),
            store = list_sink.is_some(),
            "Logger initialized"
        );

        Ok(Self {
            inner: Arc::new(LoggerInner {
                config,
                level,
                sinks: ArcSwap::from_pointee(sinks),
                list_sink,
            }),
        })
    }

    /// Build a logger, connecting to the configured store when enabled.
    ///
    /// Connection events are reported on the operational log target. When
    /// the store cannot be reached the logger runs without a list sink, so
    /// records still reach the console and `paginated` fails with
    /// [`LogError::StoreUnavailable`]. With `store.require_connection` set the
    /// connection error is returned instead.
    pub async fn connect(config: LoggerConfig) -> LogResult<Self> {
        let store: Option<Arc<dyn ListStore>> = match &config.store.connection {
            Some(connection) if config.store.enabled => {
                let events = ConnectionEvents::default();
                spawn_reporter(&events);
                match RedisStore::connect(connection, config.store.op_timeout(), events).await {
                    Ok(store) => Some(Arc::new(store)),
                    Err(e) if config.store.require_connection => return Err(e.into()),
                    Err(e) => {
                        tracing::warn!(
                            target: OPS_TARGET,
                            error = %e,
                            "Store unreachable, continuing without list sink"
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        Self::new(config, store)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn level(&self) -> Level {
        self.inner.level
    }

    /// Dispatch `record` to every sink that accepts its level.
    ///
    /// Never fails: sink errors are reported on the operational target.
    pub fn log(&self, record: LogRecord) {
        if !record.level.enabled_at(self.inner.level) {
            return;
        }
        for sink in self.inner.sinks.load().iter() {
            if !record.level.enabled_at(sink.min_level()) {
                continue;
            }
            if let Err(e) = sink.write(&record) {
                metrics::record_sink_failure(sink.name());
                tracing::warn!(
                    target: OPS_TARGET,
                    sink = sink.name(),
                    error = %e,
                    "Log sink write failed"
                );
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogRecord::new(Level::Error, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogRecord::new(Level::Warn, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogRecord::new(Level::Info, message));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogRecord::new(Level::Debug, message));
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogRecord::new(Level::Trace, message));
    }

    /// Log `err` with its source chain captured as the stack.
    pub fn log_error(
        &self,
        level: Level,
        message: impl Into<String>,
        err: &(dyn std::error::Error + 'static),
    ) {
        self.log(LogRecord::from_error(level, message, err));
    }

    /// Add a sink; records logged afterwards reach it.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>) {
        self.inner.sinks.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&sink));
            next
        });
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.load().len()
    }

    /// The list sink, if the store is enabled and connected.
    pub fn list_sink(&self) -> Option<&ListSink> {
        self.inner.list_sink.as_deref()
    }

    /// Fetch page `page` (1-indexed) of `limit` persisted entries.
    pub async fn paginated(&self, page: u64, limit: u64) -> LogResult<Page> {
        if !self.inner.config.store.enabled {
            return Err(LogError::Precondition(
                "store must be enabled to fetch logs".to_string(),
            ));
        }
        let sink = self
            .list_sink()
            .ok_or_else(|| LogError::StoreUnavailable("store instance not found".to_string()))?;
        sink.reader().fetch(page, limit).await
    }

    /// Wait for queued list writes to reach the store.
    pub async fn flush(&self) {
        if let Some(sink) = self.list_sink() {
            sink.flush().await;
        }
    }

    /// A `tracing` layer forwarding events to this logger.
    pub fn layer(&self) -> SinkLayer {
        SinkLayer::new(self.clone())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("sinks", &self.sink_count())
            .field("store_key", &self.list_sink().map(ListSink::key))
            .finish()
    }
}
