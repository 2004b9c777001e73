//! Wire format of entries pushed onto the list.
//!
//! Each entry is a self-contained JSON object:
//!
//! ```text
//! {"level": "error", "message": "...", "timestamp": "2026-01-21T14:30:45.123Z", "meta": "{...}" | null}
//! ```
//!
//! `meta` is itself a JSON-encoded object string holding every record field
//! plus the normalized `stack` lines, or `null` when there is nothing to carry.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::LogRecord;

/// Field names that live on the entry itself and never inside `meta`.
const RESERVED_FIELDS: [&str; 3] = ["level", "message", "stack"];

/// A durable log entry as stored in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub level: String,
    pub message: String,
    /// ISO 8601 UTC, stamped when the entry is persisted.
    pub timestamp: String,
    pub meta: Option<String>,
}

impl PersistedEntry {
    /// Normalize `record` into an entry stamped with the current instant.
    pub fn from_record(record: &LogRecord) -> Result<Self, serde_json::Error> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::with_timestamp(record, timestamp)
    }

    pub fn with_timestamp(
        record: &LogRecord,
        timestamp: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            level: record.level.to_string(),
            message: record.message.clone(),
            timestamp: timestamp.into(),
            meta: encode_meta(record)?,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the `meta` string back into a JSON object.
    pub fn meta_value(&self) -> Option<Result<Value, serde_json::Error>> {
        self.meta.as_deref().map(serde_json::from_str)
    }
}

/// Split a string stack into trimmed lines; other values pass through.
///
/// Returns `None` for an empty string or `null`, which count as no stack.
pub fn normalize_stack(stack: &Value) -> Option<Value> {
    match stack {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Value::Array(
            s.split('\n')
                .map(|line| Value::String(line.trim().to_string()))
                .collect(),
        )),
        other => Some(other.clone()),
    }
}

fn encode_meta(record: &LogRecord) -> Result<Option<String>, serde_json::Error> {
    let mut meta: Map<String, Value> = record
        .fields
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(stack) = record.stack.as_ref().and_then(normalize_stack) {
        meta.insert("stack".to_string(), stack);
    }

    if meta.is_empty() {
        return Ok(None);
    }
    serde_json::to_string_pretty(&Value::Object(meta)).map(Some)
}
