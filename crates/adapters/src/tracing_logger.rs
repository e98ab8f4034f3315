//! `LoggerPort` bridge onto the `tracing` ecosystem.

use crate::logger::redact_map;
use ragpolicy_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use ragpolicy_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use serde_json::{Map, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Forwards port events to `tracing` macros.
///
/// The event name is recorded as the `event` field; structured fields and the
/// error payload are recorded as redacted JSON strings.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Logger without base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields: Map<String, Value> = self
            .base_fields
            .iter()
            .chain(event.fields.iter().flatten())
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        redact_map(&mut fields);
        let fields = Value::Object(fields);
        let error = event.error.map_or(Value::Null, |mut error| {
            crate::logger::redact(&mut error);
            error
        });
        let name: &str = &event.event;
        let message: &str = &event.message;

        match event.level {
            LogLevel::Debug => tracing::debug!(event = name, fields = %fields, error = %error, "{message}"),
            LogLevel::Info => tracing::info!(event = name, fields = %fields, error = %error, "{message}"),
            LogLevel::Warn => tracing::warn!(event = name, fields = %fields, error = %error, "{message}"),
            LogLevel::Error => tracing::error!(event = name, fields = %fields, error = %error, "{message}"),
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self { base_fields })
    }
}

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]. With `json`
/// set, records are written as JSON lines; otherwise as human-readable text.
/// Fails if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to install tracing subscriber: {error}"),
            ErrorClass::NonRetriable,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragpolicy_ports::log_fields;
    use serde_json::json;

    #[test]
    fn logs_without_subscriber_are_dropped_quietly() {
        let logger = TracingLogger::new();
        let child = logger.child(log_fields([("component", json!("resolver"))]));
        child.info("config.resolve.loaded", "Active config loaded", None);
        child.log(
            LogEvent::new(LogLevel::Error, "config.save.failed", "upload failed")
                .with_error(json!({"code": "core:io"})),
        );
    }

    #[test]
    fn second_install_is_rejected() {
        let _ = init_tracing(false);
        let error = init_tracing(true).err();
        assert_eq!(error.map(|error| error.code), Some(ErrorCode::internal()));
    }
}
