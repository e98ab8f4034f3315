//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use ragpolicy_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use ragpolicy_shared::{REDACTED, is_secret_key};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const SERIALIZE_FAILED_LINE: &str = "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogRecord<'a> {
    timestamp_ms: u64,
    level: &'static str,
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
}

/// JSON logger emitting one line per event.
///
/// Field values whose key looks like a secret are replaced with `[REDACTED]`,
/// including inside nested objects and the error payload.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger at `info` level backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn encode(&self, event: LogEvent) -> String {
        let mut fields: Map<String, Value> = self
            .base_fields
            .iter()
            .chain(event.fields.iter().flatten())
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        redact_map(&mut fields);

        let mut error = event.error;
        if let Some(value) = error.as_mut() {
            redact(value);
        }

        let record = LogRecord {
            timestamp_ms: now_epoch_ms(),
            level: event.level.as_str(),
            event: &event.event,
            message: &event.message,
            fields,
            error,
        };
        serde_json::to_string(&record).map_or_else(
            |_| SERIALIZE_FAILED_LINE.to_owned(),
            |mut line| {
                line.push('\n');
                line
            },
        )
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }
        self.sink.write_line(&self.encode(event));
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            sink: Arc::clone(&self.sink),
            base_fields,
            min_level: self.min_level,
        })
    }
}

/// Replace secret-looking values in `map`, recursing into objects and arrays.
pub(crate) fn redact_map(map: &mut Map<String, Value>) {
    for (key, value) in map.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_owned());
        } else {
            redact(value);
        }
    }
}

pub(crate) fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => redact_map(map),
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {},
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
