//! Human-readable sink writing one line per record to stdout.

use std::io::Write;

use serde_json::{Map, Value};

use crate::entry::normalize_stack;
use crate::error::SinkError;
use crate::record::{Level, LogRecord};
use crate::sink::LogSink;

/// Writes `level: message {fields}` lines, optionally colorizing the level.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    level: Level,
    colorize: bool,
}

impl ConsoleSink {
    pub fn new(level: Level, colorize: bool) -> Self {
        Self { level, colorize }
    }

    /// Render a record without a trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut line = if self.colorize {
            format!("{}{}\x1b[39m: {}", color(record.level), record.level, record.message)
        } else {
            format!("{}: {}", record.level, record.message)
        };

        let mut rest: Map<String, Value> = record.fields.clone();
        if let Some(stack) = record.stack.as_ref().and_then(normalize_stack) {
            rest.insert("stack".to_string(), stack);
        }
        if !rest.is_empty() {
            line.push(' ');
            line.push_str(&Value::Object(rest).to_string());
        }
        line
    }
}

fn color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m",
        Level::Warn => "\x1b[33m",
        Level::Info => "\x1b[32m",
        Level::Debug => "\x1b[34m",
        Level::Trace => "\x1b[35m",
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> Level {
        self.level
    }

    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = self.format(record);
        let mut out = std::io::stdout().lock();
        // A closed stdout must not fail the log call.
        let _ = writeln!(out, "{line}");
        Ok(())
    }
}
