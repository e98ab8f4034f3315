//! Resolved configuration aggregate and its persisted encoding.

use crate::document::{
    ConfigDocument, ExampleDocument, IntegratedVectorizationConfig, LoggingDocument,
    MessagesDocument, OrchestratorDocument, PromptsDocument,
};
use ragpolicy_domain::{
    ADVANCED_IMAGE_PROCESSING_TYPES, AssistantType, ChunkingStrategy, ConversationalFlow,
    DocumentProcessingPolicy, DocumentType, LoadingStrategy, OrchestrationStrategy,
    PolicyLookupError, PolicyTable,
};
use ragpolicy_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure to turn stored bytes into a `Config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigDecodeError {
    /// The blob is not valid UTF-8.
    InvalidUtf8,
    /// The blob is not a JSON object of the expected shape.
    InvalidJson {
        /// Parser message.
        message: String,
    },
    /// A required field is absent after default filling.
    MissingField {
        /// Dotted field path (`prompts.condense_question_prompt`).
        field: &'static str,
    },
}

impl fmt::Display for ConfigDecodeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUtf8 => formatter.write_str("stored config is not valid UTF-8"),
            Self::InvalidJson { message } => write!(formatter, "invalid config JSON: {message}"),
            Self::MissingField { field } => write!(formatter, "config field `{field}` is missing"),
        }
    }
}

impl std::error::Error for ConfigDecodeError {}

impl From<ConfigDecodeError> for ErrorEnvelope {
    fn from(error: ConfigDecodeError) -> Self {
        let envelope = Self::expected(
            ErrorCode::new("config", "invalid_persisted_config"),
            error.to_string(),
        );
        match error {
            ConfigDecodeError::MissingField { field } => envelope.with_metadata("field", field),
            ConfigDecodeError::InvalidUtf8 | ConfigDecodeError::InvalidJson { .. } => envelope,
        }
    }
}

/// Decode stored bytes (pretty or compact JSON) into a partial document.
pub fn decode_config_document(bytes: &[u8]) -> Result<ConfigDocument, ConfigDecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ConfigDecodeError::InvalidUtf8)?;
    serde_json::from_str(text).map_err(|error| ConfigDecodeError::InvalidJson {
        message: error.to_string(),
    })
}

/// Decode a raw JSON mapping into a partial document.
pub fn document_from_value(value: &serde_json::Value) -> Result<ConfigDocument, ConfigDecodeError> {
    ConfigDocument::deserialize(value).map_err(|error| ConfigDecodeError::InvalidJson {
        message: error.to_string(),
    })
}

/// Serialize with 2-space indentation, the stored blob format.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ErrorEnvelope> {
    serde_json::to_string_pretty(value).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })
}

/// Resolved prompt settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptsConfig {
    /// Condense-question prompt.
    pub condense_question_prompt: String,
    /// Answering system prompt.
    pub answering_system_prompt: String,
    /// Answering user prompt.
    pub answering_user_prompt: String,
    /// Post-answering fact-check prompt.
    pub post_answering_prompt: String,
    /// Use the structured retrieved-documents message format.
    pub use_on_your_data_format: bool,
    /// Run the post-answering prompt.
    pub enable_post_answering_prompt: bool,
    /// Run the content safety filter.
    pub enable_content_safety: bool,
    /// Assistant persona.
    pub ai_assistant_type: AssistantType,
    /// Conversation pipeline.
    pub conversational_flow: ConversationalFlow,
}

/// Resolved user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesConfig {
    /// Message shown when the post-answering check rejects an answer.
    pub post_answering_filter: String,
}

/// Few-shot example. Absent parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleConfig {
    /// Retrieved documents payload.
    pub documents: String,
    /// Example question.
    pub user_question: String,
    /// Example answer.
    pub answer: String,
}

/// Interaction logging toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log user questions and answers.
    pub log_user_interactions: bool,
    /// Log token usage.
    pub log_tokens: bool,
}

/// Orchestrator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Orchestration strategy.
    pub strategy: OrchestrationStrategy,
}

/// Resolved configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prompt settings.
    pub prompts: PromptsConfig,
    /// User-facing messages.
    pub messages: MessagesConfig,
    /// Few-shot example.
    pub example: ExampleConfig,
    /// Interaction logging toggles.
    pub logging: LoggingConfig,
    /// Orchestrator selection.
    pub orchestrator: OrchestratorConfig,
    /// Integrated vectorization page sizing.
    pub integrated_vectorization_config: Option<IntegratedVectorizationConfig>,
    /// Keep chat history between turns.
    pub enable_chat_history: bool,
    document_processors: PolicyTable,
    advanced_image_processing_enabled: bool,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ConfigDecodeError> {
    value.ok_or(ConfigDecodeError::MissingField { field })
}

impl Config {
    /// Build from a filled document. `advanced_image_processing_enabled`
    /// controls whether advanced-only document types are listed as available.
    pub fn from_document(
        document: ConfigDocument,
        advanced_image_processing_enabled: bool,
    ) -> Result<Self, ConfigDecodeError> {
        let prompts = required(document.prompts, "prompts")?;
        let messages = required(document.messages, "messages")?;
        let logging = required(document.logging, "logging")?;
        let orchestrator = required(document.orchestrator, "orchestrator")?;
        let example = document.example.unwrap_or_default();

        Ok(Self {
            prompts: PromptsConfig {
                condense_question_prompt: required(
                    prompts.condense_question_prompt,
                    "prompts.condense_question_prompt",
                )?,
                answering_system_prompt: required(
                    prompts.answering_system_prompt,
                    "prompts.answering_system_prompt",
                )?,
                answering_user_prompt: required(
                    prompts.answering_user_prompt,
                    "prompts.answering_user_prompt",
                )?,
                post_answering_prompt: required(
                    prompts.post_answering_prompt,
                    "prompts.post_answering_prompt",
                )?,
                use_on_your_data_format: required(
                    prompts.use_on_your_data_format,
                    "prompts.use_on_your_data_format",
                )?,
                enable_post_answering_prompt: required(
                    prompts.enable_post_answering_prompt,
                    "prompts.enable_post_answering_prompt",
                )?,
                enable_content_safety: required(
                    prompts.enable_content_safety,
                    "prompts.enable_content_safety",
                )?,
                ai_assistant_type: required(prompts.ai_assistant_type, "prompts.ai_assistant_type")?,
                conversational_flow: required(
                    prompts.conversational_flow,
                    "prompts.conversational_flow",
                )?,
            },
            messages: MessagesConfig {
                post_answering_filter: required(
                    messages.post_answering_filter,
                    "messages.post_answering_filter",
                )?,
            },
            example: ExampleConfig {
                documents: example.documents.unwrap_or_default(),
                user_question: example.user_question.unwrap_or_default(),
                answer: example.answer.unwrap_or_default(),
            },
            logging: LoggingConfig {
                log_user_interactions: required(
                    logging.log_user_interactions,
                    "logging.log_user_interactions",
                )?,
                log_tokens: required(logging.log_tokens, "logging.log_tokens")?,
            },
            orchestrator: OrchestratorConfig {
                strategy: required(orchestrator.strategy, "orchestrator.strategy")?,
            },
            integrated_vectorization_config: document.integrated_vectorization_config,
            enable_chat_history: required(document.enable_chat_history, "enable_chat_history")?,
            document_processors: PolicyTable::new(required(
                document.document_processors,
                "document_processors",
            )?),
            advanced_image_processing_enabled,
        })
    }

    /// Governing policy for a document type: the last matching entry.
    pub fn document_processor(
        &self,
        document_type: &str,
    ) -> Result<&DocumentProcessingPolicy, PolicyLookupError> {
        self.document_processors.get(document_type)
    }

    /// All policies in declaration order, shadowed entries included.
    #[must_use]
    pub fn document_processors(&self) -> &[DocumentProcessingPolicy] {
        self.document_processors.entries()
    }

    /// Distinct document types that can be ingested, sorted.
    #[must_use]
    pub fn available_document_types(&self) -> Vec<DocumentType> {
        self.document_processors
            .document_types(self.advanced_image_processing_enabled)
    }

    /// Image types that support advanced image processing.
    #[must_use]
    pub fn advanced_image_processing_image_types(&self) -> &'static [&'static str] {
        &ADVANCED_IMAGE_PROCESSING_TYPES
    }

    /// Every chunking strategy.
    #[must_use]
    pub fn available_chunking_strategies(&self) -> &'static [ChunkingStrategy] {
        &ChunkingStrategy::ALL
    }

    /// Every loading strategy.
    #[must_use]
    pub fn available_loading_strategies(&self) -> &'static [LoadingStrategy] {
        &LoadingStrategy::ALL
    }

    /// Every orchestration strategy.
    #[must_use]
    pub fn available_orchestration_strategies(&self) -> &'static [OrchestrationStrategy] {
        &OrchestrationStrategy::ALL
    }

    /// Whether advanced-only document types are listed as available.
    #[must_use]
    pub const fn advanced_image_processing_enabled(&self) -> bool {
        self.advanced_image_processing_enabled
    }

    /// Convert back to the stored document shape.
    #[must_use]
    pub fn to_document(&self) -> ConfigDocument {
        ConfigDocument {
            prompts: Some(PromptsDocument {
                condense_question_prompt: Some(self.prompts.condense_question_prompt.clone()),
                answering_system_prompt: Some(self.prompts.answering_system_prompt.clone()),
                answering_user_prompt: Some(self.prompts.answering_user_prompt.clone()),
                answering_prompt: None,
                post_answering_prompt: Some(self.prompts.post_answering_prompt.clone()),
                use_on_your_data_format: Some(self.prompts.use_on_your_data_format),
                enable_post_answering_prompt: Some(self.prompts.enable_post_answering_prompt),
                enable_content_safety: Some(self.prompts.enable_content_safety),
                ai_assistant_type: Some(self.prompts.ai_assistant_type),
                conversational_flow: Some(self.prompts.conversational_flow),
            }),
            messages: Some(MessagesDocument {
                post_answering_filter: Some(self.messages.post_answering_filter.clone()),
            }),
            example: Some(ExampleDocument {
                documents: Some(self.example.documents.clone()),
                user_question: Some(self.example.user_question.clone()),
                answer: Some(self.example.answer.clone()),
            }),
            document_processors: Some(self.document_processors.entries().to_vec()),
            logging: Some(LoggingDocument {
                log_user_interactions: Some(self.logging.log_user_interactions),
                log_tokens: Some(self.logging.log_tokens),
            }),
            orchestrator: Some(OrchestratorDocument {
                strategy: Some(self.orchestrator.strategy),
            }),
            integrated_vectorization_config: self.integrated_vectorization_config,
            enable_chat_history: Some(self.enable_chat_history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DefaultConfigBuilder;
    use crate::document::FillFrom;
    use std::error::Error;

    fn default_config(advanced: bool) -> Result<Config, Box<dyn Error>> {
        let document = DefaultConfigBuilder::default()
            .use_advanced_image_processing(advanced)
            .build()?;
        Ok(Config::from_document(document, advanced)?)
    }

    #[test]
    fn dispatch_resolves_every_default_type() -> Result<(), Box<dyn Error>> {
        let config = default_config(true)?;
        for document_type in config.available_document_types() {
            let policy = config.document_processor(document_type.as_str())?;
            assert_eq!(policy.document_type, document_type);
        }

        let jpeg = config.document_processor("jpeg")?;
        assert!(jpeg.use_advanced_image_processing);
        assert_eq!(
            config.document_processor("xlsx").err(),
            Some(PolicyLookupError::NotFound {
                document_type: "xlsx".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn available_listings_cover_every_variant() -> Result<(), Box<dyn Error>> {
        let config = default_config(false)?;
        let types: Vec<String> = config
            .available_document_types()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            types,
            vec![
                "bmp", "docx", "htm", "html", "jpeg", "jpg", "json", "md", "pdf", "png", "tiff",
                "txt", "url"
            ]
        );
        assert_eq!(config.available_chunking_strategies().len(), 5);
        assert_eq!(config.available_loading_strategies().len(), 4);
        assert_eq!(config.available_orchestration_strategies().len(), 4);
        assert_eq!(
            config.advanced_image_processing_image_types(),
            ["jpeg", "jpg", "png", "tiff", "bmp"]
        );
        Ok(())
    }

    #[test]
    fn missing_required_field_is_reported_by_path() -> Result<(), Box<dyn Error>> {
        let mut document = DefaultConfigBuilder::default().build()?;
        if let Some(prompts) = document.prompts.as_mut() {
            prompts.enable_content_safety = None;
        }
        let error = Config::from_document(document, false).err();
        assert_eq!(
            error,
            Some(ConfigDecodeError::MissingField {
                field: "prompts.enable_content_safety"
            })
        );
        Ok(())
    }

    #[test]
    fn absent_example_becomes_empty_strings() -> Result<(), Box<dyn Error>> {
        let mut document = DefaultConfigBuilder::default().build()?;
        document.example = None;
        let config = Config::from_document(document, false)?;
        assert_eq!(config.example, ExampleConfig::default());
        Ok(())
    }

    #[test]
    fn to_document_round_trips_through_from_document() -> Result<(), Box<dyn Error>> {
        let config = default_config(true)?;
        let rebuilt = Config::from_document(config.to_document(), true)?;
        assert_eq!(rebuilt, config);
        Ok(())
    }

    #[test]
    fn decode_accepts_compact_and_pretty_json() -> Result<(), Box<dyn Error>> {
        let defaults = DefaultConfigBuilder::default().build()?;
        let pretty = to_pretty_json(&defaults)?;
        let compact = serde_json::to_string(&defaults)?;

        assert!(pretty.contains("\n  \"prompts\": {"));
        assert_eq!(decode_config_document(pretty.as_bytes())?, defaults);
        assert_eq!(decode_config_document(compact.as_bytes())?, defaults);
        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(
            decode_config_document(&[0xff, 0xfe]),
            Err(ConfigDecodeError::InvalidUtf8)
        );
        assert!(matches!(
            decode_config_document(b"{not json"),
            Err(ConfigDecodeError::InvalidJson { .. })
        ));
        assert!(matches!(
            decode_config_document(b"[1, 2]"),
            Err(ConfigDecodeError::InvalidJson { .. })
        ));
    }

    #[test]
    fn raw_mapping_decodes_and_fills() -> Result<(), Box<dyn Error>> {
        let defaults = DefaultConfigBuilder::default().build()?;
        let value = serde_json::json!({"orchestrator": {"strategy": "langchain"}});
        let filled = document_from_value(&value)?.fill_from(&defaults);
        let config = Config::from_document(filled, false)?;
        assert_eq!(config.orchestrator.strategy, OrchestrationStrategy::Langchain);
        Ok(())
    }
}
