//! Contract-style tests for port traits using in-memory adapters.

use ragpolicy_ports::{BlobKey, BlobStorePort, JSON_CONTENT_TYPE, LogLevel, LoggerPort, log_fields};
use ragpolicy_shared::{ErrorCode, Result};
use ragpolicy_testkit::errors::storage_unavailable_error;
use ragpolicy_testkit::in_memory::{BlobCall, InMemoryBlobStore, NoopLogger, RecordingLogger};
use std::sync::Arc;

#[test]
fn blob_store_port_contract_smoke() -> Result<()> {
    let store = InMemoryBlobStore::new();
    let port: Arc<dyn BlobStorePort> = Arc::new(store.clone());
    let key = BlobKey::new("config", "active.json")?;

    assert!(!port.exists(&key)?);
    port.upload(&key, b"{\"a\": 1}", JSON_CONTENT_TYPE)?;
    assert!(port.exists(&key)?);
    assert_eq!(port.download(&key)?, b"{\"a\": 1}".to_vec());
    assert_eq!(store.content_type(&key).as_deref(), Some(JSON_CONTENT_TYPE));

    port.delete(&key)?;
    assert!(!port.exists(&key)?);
    let missing = port.download(&key).err();
    assert_eq!(missing.map(|error| error.code), Some(ErrorCode::not_found()));

    assert_eq!(
        store.operations(),
        vec!["exists", "upload", "exists", "download", "delete", "exists", "download"]
    );
    Ok(())
}

#[test]
fn blob_store_keys_are_scoped_by_container() -> Result<()> {
    let store = InMemoryBlobStore::new();
    let active = BlobKey::new("config", "active.json")?;
    let other = BlobKey::new("documents", "active.json")?;

    store.insert(&active, "{}");
    assert!(store.exists(&active)?);
    assert!(!store.exists(&other)?);
    assert_eq!(
        store.calls(),
        vec![BlobCall::Exists(active), BlobCall::Exists(other)]
    );
    Ok(())
}

#[test]
fn injected_failures_surface_unchanged() -> Result<()> {
    let store = InMemoryBlobStore::new();
    let key = BlobKey::new("config", "active.json")?;
    store.fail_on("exists", storage_unavailable_error());

    let error = store.exists(&key).err();
    assert_eq!(error, Some(storage_unavailable_error()));
    assert_eq!(store.count("exists"), 1);
    Ok(())
}

#[test]
fn logger_port_contract_smoke() {
    let noop = NoopLogger;
    noop.info("config.resolve.loaded", "ignored", None);
    noop.child(log_fields([("k", serde_json::json!("v"))]))
        .warn("config.save.rejected", "ignored", None);

    let recorder = RecordingLogger::new();
    recorder.warn(
        "config.resolve.decode_failed",
        "bad blob",
        Some(log_fields([("bytes", serde_json::json!(3))])),
    );
    let event = recorder.find("config.resolve.decode_failed");
    assert_eq!(event.map(|event| event.level), Some(LogLevel::Warn));
    assert_eq!(recorder.event_names(), vec!["config.resolve.decode_failed"]);
}
