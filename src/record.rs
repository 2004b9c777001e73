//! Log levels and the structured record handed to sinks.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Severity of a record, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    /// Whether a record at this level passes a `threshold` minimum.
    pub fn enabled_at(self, threshold: Level) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        if *level == tracing::Level::ERROR {
            Level::Error
        } else if *level == tracing::Level::WARN {
            Level::Warn
        } else if *level == tracing::Level::INFO {
            Level::Info
        } else if *level == tracing::Level::DEBUG {
            Level::Debug
        } else {
            Level::Trace
        }
    }
}

/// One log call. Owned by the call site and passed once to the sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    /// Usually a multi-line string; other JSON values are persisted as-is.
    pub stack: Option<Value>,
    /// Additional structured fields.
    pub fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            stack: None,
            fields: Map::new(),
        }
    }

    /// Build a record whose stack is the rendered source chain of `err`.
    pub fn from_error(
        level: Level,
        message: impl Into<String>,
        err: &(dyn std::error::Error + 'static),
    ) -> Self {
        Self::new(level, message)
            .with_field("error", err.to_string())
            .with_stack(error_stack(err))
    }

    /// Add a field. A field named `stack` sets the record's stack instead.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == "stack" {
            self.stack = Some(value.into());
        } else {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn with_stack(mut self, stack: impl Into<Value>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Render an error and its sources one per line, outermost first.
pub fn error_stack(err: &(dyn std::error::Error + 'static)) -> String {
    let mut stack = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(stack, "\n    caused by: {cause}");
        source = cause.source();
    }
    stack
}
