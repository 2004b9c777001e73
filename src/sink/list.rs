//! Sink that appends persisted entries to a store list.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::entry::PersistedEntry;
use crate::error::{LogError, LogResult, SinkError};
use crate::observability::{metrics, OPS_TARGET};
use crate::reader::PageReader;
use crate::record::{Level, LogRecord};
use crate::sink::LogSink;
use crate::store::ListStore;

enum WriterCommand {
    Push(String),
    Flush(oneshot::Sender<()>),
}

/// Appends each record to the head of the list at `key`.
///
/// Writes are fire-and-forget: [`LogSink::write`] serializes the entry and
/// hands it to a background writer task, which pushes entries in the order
/// they were written. A failed push is reported on the operational target
/// and the entry is dropped. Use [`ListSink::flush`] or [`ListSink::append`]
/// when the caller needs the store's acknowledgment.
///
/// At most `capacity` entries wait for the writer. While the queue is full,
/// writes fail with [`SinkError::Full`] and the entry is not kept.
pub struct ListSink {
    key: String,
    level: Level,
    capacity: usize,
    store: Arc<dyn ListStore>,
    tx: mpsc::Sender<WriterCommand>,
}

impl ListSink {
    /// Create the sink and spawn its writer on the current Tokio runtime.
    ///
    /// Fails with [`LogError::Runtime`] when called outside a runtime.
    pub fn new(
        store: Arc<dyn ListStore>,
        key: impl Into<String>,
        level: Level,
        capacity: usize,
    ) -> LogResult<Self> {
        let handle = Handle::try_current().map_err(|e| LogError::Runtime(e.to_string()))?;
        let key = key.into();
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        handle.spawn(run_writer(Arc::clone(&store), key.clone(), rx));
        Ok(Self {
            key,
            level,
            capacity,
            store,
            tx,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The store handle this sink writes to.
    pub fn store(&self) -> Arc<dyn ListStore> {
        Arc::clone(&self.store)
    }

    /// A reader over the same list.
    pub fn reader(&self) -> PageReader {
        PageReader::new(self.store(), self.key.clone())
    }

    /// Push `record` directly and wait for the store's acknowledgment.
    ///
    /// Returns the list length after the push. Bypasses the writer queue,
    /// so ordering relative to queued writes is not guaranteed.
    pub async fn append(&self, record: &LogRecord) -> LogResult<u64> {
        let line = PersistedEntry::from_record(record)?.to_json()?;
        let len = self.store.push(&self.key, line).await?;
        metrics::record_push();
        Ok(len)
    }

    /// Wait until every entry written before this call has been pushed
    /// (or dropped after a failed push).
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriterCommand::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }
}

impl LogSink for ListSink {
    fn name(&self) -> &str {
        "list"
    }

    fn min_level(&self) -> Level {
        self.level
    }

    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = PersistedEntry::from_record(record)?.to_json()?;
        self.tx
            .try_send(WriterCommand::Push(line))
            .map_err(|e| match e {
                TrySendError::Full(_) => SinkError::Full {
                    capacity: self.capacity,
                },
                TrySendError::Closed(_) => SinkError::Closed,
            })?;
        metrics::record_enqueued();
        Ok(())
    }
}

async fn run_writer(
    store: Arc<dyn ListStore>,
    key: String,
    mut rx: mpsc::Receiver<WriterCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriterCommand::Push(line) => match store.push(&key, line).await {
                Ok(_) => metrics::record_push(),
                Err(e) => {
                    metrics::record_push_failure();
                    tracing::warn!(
                        target: OPS_TARGET,
                        key = %key,
                        error = %e,
                        "Dropped log entry after failed push"
                    );
                }
            },
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!(target: OPS_TARGET, key = %key, "List writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::Semaphore;

    fn sink(store: &MemoryStore) -> ListSink {
        ListSink::new(Arc::new(store.clone()), "logs:errors", Level::Trace, 64).unwrap()
    }

    /// Holds pushes until permits are added.
    struct Stalled {
        inner: MemoryStore,
        gate: Semaphore,
    }

    #[async_trait]
    impl ListStore for Stalled {
        async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
            self.inner.push(key, value).await
        }

        async fn length(&self, key: &str) -> StoreResult<u64> {
            self.inner.length(key).await
        }

        async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>> {
            self.inner.range(key, start, end).await
        }
    }

    #[tokio::test]
    async fn test_write_then_flush_pushes_entry() {
        let store = MemoryStore::new();
        let sink = sink(&store);

        let record = LogRecord::new(Level::Info, "Test log").with_field("x", 1);
        sink.write(&record).unwrap();
        sink.flush().await;

        let lines = store.range("logs:errors", 0, -1).await.unwrap();
        assert_eq!(lines.len(), 1);

        let entry: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(entry["level"], "info");
        assert_eq!(entry["message"], "Test log");
        let meta: Value = serde_json::from_str(entry["meta"].as_str().unwrap()).unwrap();
        assert_eq!(meta, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_writes_keep_order_newest_first() {
        let store = MemoryStore::new();
        let sink = sink(&store);

        for i in 0..5 {
            sink.write(&LogRecord::new(Level::Error, format!("entry {i}")))
                .unwrap();
        }
        sink.flush().await;

        let lines = store.range("logs:errors", 0, -1).await.unwrap();
        let messages: Vec<String> = lines
            .iter()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["message"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(messages, ["entry 4", "entry 3", "entry 2", "entry 1", "entry 0"]);
    }

    #[tokio::test]
    async fn test_append_waits_for_store() {
        let store = MemoryStore::new();
        let sink = sink(&store);

        let len = sink
            .append(&LogRecord::new(Level::Error, "acknowledged"))
            .await
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(store.length("logs:errors").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_full_queue_rejects_writes() {
        let store = Arc::new(Stalled {
            inner: MemoryStore::new(),
            gate: Semaphore::new(0),
        });
        let sink = ListSink::new(store.clone(), "logs:errors", Level::Trace, 4).unwrap();

        let mut accepted = 0;
        let mut rejected = 0;
        for i in 0..100 {
            match sink.write(&LogRecord::new(Level::Error, format!("entry {i}"))) {
                Ok(()) => accepted += 1,
                Err(SinkError::Full { capacity }) => {
                    assert_eq!(capacity, 4);
                    rejected += 1;
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        // The writer may hold one entry in flight on top of the queue.
        assert!(accepted <= 5, "accepted {accepted}");
        assert_eq!(accepted + rejected, 100);

        store.gate.add_permits(accepted);
        sink.flush().await;
        assert_eq!(store.inner.length("logs:errors").await.unwrap(), accepted as u64);

        sink.write(&LogRecord::new(Level::Error, "after drain")).unwrap();
        store.gate.add_permits(1);
        sink.flush().await;
        assert_eq!(store.inner.length("logs:errors").await.unwrap(), accepted as u64 + 1);
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = ListSink::new(Arc::new(MemoryStore::new()), "logs:errors", Level::Error, 8);
        assert!(matches!(result, Err(LogError::Runtime(_))));
    }
}
