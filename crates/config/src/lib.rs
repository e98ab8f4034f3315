//! # ragpolicy-config
//!
//! Configuration document, defaults, legacy migration, and validation for
//! the ingestion policy service. This crate depends on `domain` and `shared` only.

/// Baseline configuration.
pub mod defaults;
/// Partial stored configuration document and default filling.
pub mod document;
/// Environment variable parsing.
pub mod env;
/// Legacy schema detection and migration.
pub mod migration;
/// Built-in prompt texts.
pub mod prompts;
/// Resolved configuration aggregate and persisted encoding.
pub mod schema;
/// Candidate validation before persistence.
pub mod validation;

pub use defaults::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DefaultConfigBuilder};
pub use document::{
    ConfigDocument, ExampleDocument, FillFrom, IntegratedVectorizationConfig, LoggingDocument,
    MessagesDocument, OrchestratorDocument, PromptsDocument,
};
pub use env::{
    ConfigEnv, ENV_LOAD_CONFIG_FROM_BLOB_STORAGE, ENV_ORCHESTRATION_STRATEGY,
    ENV_USE_ADVANCED_IMAGE_PROCESSING, EnvParseError,
};
pub use migration::{LegacyConfigDocument, StoredConfig, migrate};
pub use prompts::{
    assistant_prompt, default_assistant_prompt, default_contract_assistant_prompt,
    default_employee_assistant_prompt,
};
pub use schema::{
    Config, ConfigDecodeError, ExampleConfig, LoggingConfig, MessagesConfig, OrchestratorConfig,
    PromptsConfig, decode_config_document, document_from_value, to_pretty_json,
};
pub use validation::{ConfigValidationError, validate_advanced_image_processing};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragpolicy_domain::domain_crate_version;
    use ragpolicy_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_domain_and_shared() {
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
