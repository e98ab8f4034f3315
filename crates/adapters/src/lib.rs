//! # ragpolicy-adapters
//!
//! Adapter implementations for ports (local blob storage, structured logging).
//! This crate depends on `ports` and `shared`.

pub mod local_blob_store;
pub mod log_sink;
pub mod logger;
pub mod tracing_logger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use local_blob_store::LocalBlobStore;
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use tracing_logger::{DEFAULT_LOG_FILTER, TracingLogger, init_tracing};
