//! Schema detection and migration of stored configuration.
//!
//! Stored documents are classified into `StoredConfig::Legacy` or
//! `StoredConfig::Current` once, and `migrate` handles each variant
//! explicitly.
//!
//! Legacy documents carry a single free-form `prompts.answering_prompt` and
//! neither `answering_system_prompt` nor `answering_user_prompt`. Migration
//! rewrites them into the split-prompt shape and then fills every absent
//! field from the defaults. Current documents are only filled. Migrating an
//! already-migrated document is a no-op.

use crate::document::{ConfigDocument, FillFrom, PromptsDocument};

/// Stored document in the pre-split prompt schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyConfigDocument {
    answering_prompt: String,
    document: ConfigDocument,
}

impl LegacyConfigDocument {
    /// The stored free-form answering prompt.
    #[must_use]
    pub fn answering_prompt(&self) -> &str {
        &self.answering_prompt
    }

    /// The stored document, unmodified.
    #[must_use]
    pub const fn document(&self) -> &ConfigDocument {
        &self.document
    }
}

/// Stored document tagged by schema generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredConfig {
    /// Pre-split prompt schema.
    Legacy(LegacyConfigDocument),
    /// Current schema, possibly with absent fields.
    Current(ConfigDocument),
}

impl StoredConfig {
    /// Classify a decoded document by schema generation.
    #[must_use]
    pub fn classify(document: ConfigDocument) -> Self {
        let legacy_prompt = document.prompts().and_then(|prompts| {
            let split_absent =
                prompts.answering_system_prompt.is_none() && prompts.answering_user_prompt.is_none();
            if split_absent {
                prompts.answering_prompt.clone()
            } else {
                None
            }
        });

        match legacy_prompt {
            Some(answering_prompt) => Self::Legacy(LegacyConfigDocument {
                answering_prompt,
                document,
            }),
            None => Self::Current(document),
        }
    }

    /// Returns true for the pre-split prompt schema.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

/// Migrate a stored document into the current schema and fill it from `defaults`.
///
/// For legacy documents the stored `answering_prompt` is compared with the
/// default document's `answering_prompt` (the last shipped legacy text):
/// - unchanged: system and user prompts take the new defaults and
///   `use_on_your_data_format` becomes `true`
/// - customised: the text is kept verbatim as `answering_user_prompt`, the
///   system prompt takes the default and `use_on_your_data_format` becomes `false`
#[must_use]
pub fn migrate(stored: StoredConfig, defaults: &ConfigDocument) -> ConfigDocument {
    match stored {
        StoredConfig::Legacy(legacy) => migrate_legacy(legacy, defaults).fill_from(defaults),
        StoredConfig::Current(document) => document.fill_from(defaults),
    }
}

fn migrate_legacy(legacy: LegacyConfigDocument, defaults: &ConfigDocument) -> ConfigDocument {
    let LegacyConfigDocument {
        answering_prompt,
        mut document,
    } = legacy;
    let default_prompts = defaults.prompts().cloned().unwrap_or_default();
    let modified = default_prompts.answering_prompt.as_deref() != Some(answering_prompt.as_str());

    let answering_user_prompt = if modified {
        Some(answering_prompt)
    } else {
        default_prompts.answering_user_prompt
    };

    let prompts = document.prompts.take().unwrap_or_default();
    document.prompts = Some(PromptsDocument {
        answering_system_prompt: default_prompts.answering_system_prompt,
        answering_user_prompt,
        use_on_your_data_format: Some(!modified),
        ..prompts
    });
    document
}
