//! In-process list store.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{ListStore, StoreResult};

/// A thread-safe, in-memory [`ListStore`].
///
/// Clones share the same lists. Useful for tests and for running the
/// logger without a remote store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, VecDeque<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys holding a list.
    pub fn key_count(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        let mut list = self.inner.entry(key.to_string()).or_default();
        list.push_front(value);
        Ok(list.len() as u64)
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        Ok(self.inner.get(key).map(|list| list.len() as u64).unwrap_or(0))
    }

    async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>> {
        let Some(list) = self.inner.get(key) else {
            return Ok(Vec::new());
        };
        Ok(match resolve_range(list.len(), start, end) {
            Some((start, end)) => list.range(start..=end).cloned().collect(),
            None => Vec::new(),
        })
    }
}

/// Map LRANGE-style inclusive bounds onto `0..len`.
pub(crate) fn resolve_range(len: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };
    if start >= len || start > end {
        return None;
    }
    Some((start as usize, end as usize))
}
