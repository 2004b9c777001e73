//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use list_logger::store::{ListStore, MemoryStore, StoreError, StoreResult};
use list_logger::{Level, LogRecord, LoggerConfig, PersistedEntry};
use tokio::sync::Semaphore;

/// Default config with the console sink off and every level persisted.
pub fn quiet_config() -> LoggerConfig {
    let mut config = LoggerConfig::default();
    config.console.enabled = false;
    config.store.level = "trace".to_string();
    config
}

/// Push `count` entries named "Test log 0".."Test log {count-1}", oldest first.
pub async fn seed(store: &MemoryStore, key: &str, count: usize) {
    for i in 0..count {
        let record = LogRecord::new(Level::Info, format!("Test log {i}"));
        let line = PersistedEntry::from_record(&record)
            .unwrap()
            .to_json()
            .unwrap();
        store.push(key, line).await.unwrap();
    }
}

/// A store whose every call fails as if the server were down.
pub struct FailingStore;

#[async_trait]
impl ListStore for FailingStore {
    async fn push(&self, _key: &str, _value: String) -> StoreResult<u64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn length(&self, _key: &str) -> StoreResult<u64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn range(&self, _key: &str, _start: i64, _end: i64) -> StoreResult<Vec<String>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }
}

/// Fails only the range read; length still succeeds.
pub struct BrokenRangeStore(pub MemoryStore);

#[async_trait]
impl ListStore for BrokenRangeStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        self.0.push(key, value).await
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        self.0.length(key).await
    }

    async fn range(&self, _key: &str, _start: i64, _end: i64) -> StoreResult<Vec<String>> {
        Err(StoreError::Command("LRANGE failed".to_string()))
    }
}

/// Counts every call before delegating to an in-memory store.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListStore for CountingStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.push(key, value).await
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.length(key).await
    }

    async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.range(key, start, end).await
    }
}

/// Holds every push until a permit is released with [`GatedStore::open`].
pub struct GatedStore {
    pub inner: MemoryStore,
    gate: Semaphore,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
        }
    }

    /// Let `pushes` more pushes through.
    pub fn open(&self, pushes: usize) {
        self.gate.add_permits(pushes);
    }
}

#[async_trait]
impl ListStore for GatedStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        self.gate
            .acquire()
            .await
            .map_err(|_| StoreError::Connection("gate closed".to_string()))?
            .forget();
        self.inner.push(key, value).await
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        self.inner.length(key).await
    }

    async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>> {
        self.inner.range(key, start, end).await
    }
}
