//! Custom tracing Layer that forwards events to a [`Logger`].
//!
//! Lets applications keep using `tracing` macros while records reach the
//! logger's sinks. A `stack` field becomes the record's stack, and an error
//! recorded with `error = &err as &dyn Error` contributes its source chain
//! when no explicit stack is given.

use std::fmt::Write as FmtWrite;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::logger::Logger;
use crate::observability::OPS_TARGET;
use crate::record::{error_stack, Level, LogRecord};

/// A tracing Layer dispatching events to a logger's sinks.
///
/// Events on the operational target are skipped so failures of the sinks
/// themselves never loop back into them.
pub struct SinkLayer {
    logger: Logger,
}

impl SinkLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OPS_TARGET) {
            return;
        }

        let level = Level::from(metadata.level());
        if !level.enabled_at(self.logger.level()) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        self.logger.log(LogRecord {
            level,
            message: visitor.message.unwrap_or_default(),
            stack: visitor.stack.or(visitor.error_stack.map(Value::String)),
            fields: visitor.fields,
        });
    }
}

/// Visitor that collects the message, stack and fields of an event.
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    stack: Option<Value>,
    error_stack: Option<String>,
    fields: Map<String, Value>,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                });
            }
            "stack" => self.stack = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);
        self.insert(field, Value::String(buf));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if self.error_stack.is_none() {
            self.error_stack = Some(error_stack(value));
        }
        self.insert(field, Value::String(value.to_string()));
    }
}
