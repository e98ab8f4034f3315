//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests
//! - Deterministic contract tests for the ports layer
//! - Asserting the exact storage calls a use case makes

use ragpolicy_ports::{BlobKey, BlobStorePort, LogEvent, LogFields, LoggerPort};
use ragpolicy_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// Logger that keeps every event for later assertions.
///
/// Children share the same event buffer and merge their base fields into
/// each event.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl RecordingLogger {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<LogEvent> {
        lock(&self.events).clone()
    }

    /// Names of recorded events, in order.
    pub fn event_names(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .map(|event| event.event.to_string())
            .collect()
    }

    /// First recorded event with the given name.
    pub fn find(&self, name: &str) -> Option<LogEvent> {
        lock(&self.events)
            .iter()
            .find(|event| event.event.as_ref() == name)
            .cloned()
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        lock(&self.events).push(event);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields,
        })
    }
}

/// A call observed by `InMemoryBlobStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    /// `exists(key)`.
    Exists(BlobKey),
    /// `download(key)`.
    Download(BlobKey),
    /// `upload(key, body, content_type)`.
    Upload {
        /// Target key.
        key: BlobKey,
        /// Uploaded bytes.
        body: Vec<u8>,
        /// Declared content type.
        content_type: String,
    },
    /// `delete(key)`.
    Delete(BlobKey),
}

impl BlobCall {
    /// Short operation name (`exists`, `download`, `upload`, `delete`).
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Exists(_) => "exists",
            Self::Download(_) => "download",
            Self::Upload { .. } => "upload",
            Self::Delete(_) => "delete",
        }
    }
}

#[derive(Debug, Default)]
struct BlobStoreState {
    blobs: BTreeMap<(String, String), (Vec<u8>, String)>,
    calls: Vec<BlobCall>,
    failing: BTreeMap<&'static str, ErrorEnvelope>,
}

/// Blob store kept in memory that records every call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    state: Arc<Mutex<BlobStoreState>>,
}

fn key_of(key: &BlobKey) -> (String, String) {
    (key.container().to_owned(), key.name().to_owned())
}

impl InMemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob without recording a call.
    pub fn insert(&self, key: &BlobKey, body: impl Into<Vec<u8>>) {
        lock(&self.state)
            .blobs
            .insert(key_of(key), (body.into(), "application/json".to_owned()));
    }

    /// Stored bytes, if present. Not recorded.
    pub fn get(&self, key: &BlobKey) -> Option<Vec<u8>> {
        lock(&self.state)
            .blobs
            .get(&key_of(key))
            .map(|(body, _)| body.clone())
    }

    /// Stored content type, if present. Not recorded.
    pub fn content_type(&self, key: &BlobKey) -> Option<String> {
        lock(&self.state)
            .blobs
            .get(&key_of(key))
            .map(|(_, content_type)| content_type.clone())
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<BlobCall> {
        lock(&self.state).calls.clone()
    }

    /// Operation names of every call made so far.
    pub fn operations(&self) -> Vec<&'static str> {
        lock(&self.state)
            .calls
            .iter()
            .map(BlobCall::operation)
            .collect()
    }

    /// Number of calls for one operation.
    pub fn count(&self, operation: &str) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Forget recorded calls, keeping stored blobs.
    pub fn reset_calls(&self) {
        lock(&self.state).calls.clear();
    }

    /// Make every later call to `operation` fail with `error`. The call is still recorded.
    pub fn fail_on(&self, operation: &'static str, error: ErrorEnvelope) {
        lock(&self.state).failing.insert(operation, error);
    }

    fn record(&self, call: BlobCall) -> Result<MutexGuard<'_, BlobStoreState>> {
        let mut state = lock(&self.state);
        let failure = state.failing.get(call.operation()).cloned();
        state.calls.push(call);
        match failure {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

impl BlobStorePort for InMemoryBlobStore {
    fn exists(&self, key: &BlobKey) -> Result<bool> {
        let state = self.record(BlobCall::Exists(key.clone()))?;
        Ok(state.blobs.contains_key(&key_of(key)))
    }

    fn download(&self, key: &BlobKey) -> Result<Vec<u8>> {
        let state = self.record(BlobCall::Download(key.clone()))?;
        state
            .blobs
            .get(&key_of(key))
            .map(|(body, _)| body.clone())
            .ok_or_else(|| {
                ErrorEnvelope::expected(ErrorCode::not_found(), format!("blob {key} not found"))
            })
    }

    fn upload(&self, key: &BlobKey, body: &[u8], content_type: &str) -> Result<()> {
        let mut state = self.record(BlobCall::Upload {
            key: key.clone(),
            body: body.to_vec(),
            content_type: content_type.to_owned(),
        })?;
        state
            .blobs
            .insert(key_of(key), (body.to_vec(), content_type.to_owned()));
        Ok(())
    }

    fn delete(&self, key: &BlobKey) -> Result<()> {
        let mut state = self.record(BlobCall::Delete(key.clone()))?;
        state.blobs.remove(&key_of(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragpolicy_ports::log_fields;

    #[test]
    fn recording_logger_children_share_buffer() {
        let logger = RecordingLogger::new();
        let child = logger.child(log_fields([("component", serde_json::json!("resolver"))]));
        child.info("config.resolve.loaded", "loaded", None);

        let events = logger.events();
        assert_eq!(events.len(), 1);
        let fields = events[0].fields.clone().unwrap_or_default();
        assert_eq!(fields.get("component"), Some(&serde_json::json!("resolver")));
    }

    #[test]
    fn blob_store_records_failing_calls() -> Result<()> {
        let store = InMemoryBlobStore::new();
        let key = BlobKey::new("config", "active.json")?;
        store.fail_on("upload", ErrorEnvelope::from(std::io::Error::other("disk full")));

        assert!(store.upload(&key, b"{}", "application/json").is_err());
        assert_eq!(store.operations(), vec!["upload"]);
        assert_eq!(store.get(&key), None);
        Ok(())
    }
}
