//! # ragpolicy-ports
//!
//! Port traits for the ragpolicy hexagonal architecture.
//!
//! This crate defines the interfaces between the configuration core and the
//! collaborators it talks to (blob storage, structured logging). It depends
//! only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod blob_store;
pub mod logger;

pub use blob_store::*;
pub use logger::*;

// Re-export the domain types that appear next to port signatures, so adapter
// crates can work with policies without depending on `ragpolicy-domain`.
pub use ragpolicy_domain::{DocumentProcessingPolicy, DocumentType};
