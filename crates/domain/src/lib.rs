//! # ragpolicy-domain
//!
//! Document-processing policy model for the chatbot ingestion pipeline.
//!
//! - **Primitives** - `DocumentType`, the advanced-image type set
//! - **Strategies** - chunking, loading and orchestration strategy names,
//!   assistant personas, conversational flows
//! - **Policy** - `ChunkingSettings`, `LoadingSettings`, `DocumentProcessingPolicy`
//! - **Policy table** - ordered policies with last-entry-wins dispatch
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use ragpolicy_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod policy;
pub mod policy_table;
pub mod primitives;
pub mod strategies;

pub use policy::{ChunkingSettings, DocumentProcessingPolicy, LoadingSettings};
pub use policy_table::{PolicyLookupError, PolicyTable};
pub use primitives::{ADVANCED_IMAGE_PROCESSING_TYPES, DocumentType, PrimitiveError};
pub use strategies::{
    AssistantType, ChunkingStrategy, ConversationalFlow, LoadingStrategy, OrchestrationStrategy,
    StrategyParseError,
};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        let version = domain_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn domain_depends_on_shared() {
        let shared_version = shared_crate_version();
        assert_eq!(shared_version, domain_crate_version());
    }
}
