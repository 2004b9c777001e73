//! Paginated reads over a persisted list.
//!
//! Pages are 1-indexed windows over the newest-first list. The total count
//! and the window are read concurrently and are not transactionally
//! consistent: entries pushed between the two reads can make `total_count`
//! disagree with the window by a few entries. The next read reflects the
//! current list, so there is no cursor or snapshot.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{LogError, LogResult};
use crate::observability::metrics;
use crate::store::ListStore;

/// One page of decoded entries plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page: u64,
    pub limit: u64,
    /// List length when the page was read.
    pub total_count: u64,
    /// `ceil(total_count / limit)`, recomputed on every read.
    pub total_pages: u64,
    /// Decoded entries, or `{"raw": ...}` for entries that are not JSON.
    pub logs: Vec<Value>,
}

/// Reads pages from the list at `key`.
#[derive(Clone)]
pub struct PageReader {
    store: Arc<dyn ListStore>,
    key: String,
}

impl PageReader {
    pub fn new(store: Arc<dyn ListStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetch page `page` (1-indexed) of `limit` entries.
    ///
    /// Fails without partial data if either store read fails.
    pub async fn fetch(&self, page: u64, limit: u64) -> LogResult<Page> {
        let (start, end) = window(page, limit)?;
        let started = Instant::now();

        let (total_count, raw) = tokio::try_join!(
            self.store.length(&self.key),
            self.store.range(&self.key, start, end),
        )?;

        let logs = raw.iter().map(|line| decode_entry(line)).collect();
        metrics::record_page_served(started.elapsed());

        Ok(Page {
            page,
            limit,
            total_count,
            total_pages: total_pages(total_count, limit),
            logs,
        })
    }
}

/// Zero-based inclusive list indices covered by `page`.
///
/// Indices beyond `i64::MAX` are clamped; no list is that long, so the
/// clamped window reads as empty or as the list's tail.
pub fn window(page: u64, limit: u64) -> LogResult<(i64, i64)> {
    if page == 0 || limit == 0 {
        return Err(LogError::InvalidPage { page, limit });
    }
    let start = (page - 1).saturating_mul(limit);
    let end = start.saturating_add(limit - 1);
    Ok((
        i64::try_from(start).unwrap_or(i64::MAX),
        i64::try_from(end).unwrap_or(i64::MAX),
    ))
}

/// `ceil(total_count / limit)`; 0 when the list is empty.
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

/// Decode a stored line, wrapping anything that is not JSON as `{"raw": line}`.
pub fn decode_entry(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|_| json!({ "raw": line }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_window() {
        assert_eq!(window(1, 10).unwrap(), (0, 9));
        assert_eq!(window(3, 20).unwrap(), (40, 59));
        assert_eq!(window(7, 1).unwrap(), (6, 6));
        assert!(matches!(
            window(0, 10),
            Err(LogError::InvalidPage { page: 0, limit: 10 })
        ));
        assert!(window(1, 0).is_err());
        assert_eq!(window(1, u64::MAX).unwrap(), (0, i64::MAX));
        assert_eq!(window(u64::MAX, u64::MAX).unwrap(), (i64::MAX, i64::MAX));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(118, 10), 12);
    }

    #[test]
    fn test_decode_entry() {
        let decoded = decode_entry(r#"{"level": "info", "message": "Test log 1"}"#);
        assert_eq!(decoded["message"], "Test log 1");

        let decoded = decode_entry("plain text line");
        assert_eq!(decoded, json!({"raw": "plain text line"}));
    }

    #[tokio::test]
    async fn test_fetch_past_end_is_empty() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store.push("k", format!("{{\"n\":{i}}}")).await.unwrap();
        }
        let reader = PageReader::new(Arc::new(store), "k");

        let page = reader.fetch(2, 3).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
        assert!(page.logs.is_empty());
    }

    #[tokio::test]
    async fn test_huge_limit_returns_whole_list() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store.push("k", format!("{{\"n\":{i}}}")).await.unwrap();
        }
        let reader = PageReader::new(Arc::new(store), "k");

        let page = reader.fetch(1, u64::MAX).await.unwrap();
        assert_eq!(page.logs.len(), 3);
        assert_eq!(page.total_pages, 1);

        let page = reader.fetch(u64::MAX, 2).await.unwrap();
        assert!(page.logs.is_empty());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page {
            page: 1,
            limit: 10,
            total_count: 0,
            total_pages: 0,
            logs: Vec::new(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            json!({"page": 1, "limit": 10, "totalCount": 0, "totalPages": 0, "logs": []})
        );
    }
}
