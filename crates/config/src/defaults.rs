//! Baseline configuration.
//!
//! The base table carries one non-advanced policy per supported document
//! type. With advanced image processing enabled, one advanced policy per
//! image type is appended after it; dispatch resolves to the last entry, so
//! the appended entry governs.

use crate::document::{
    ConfigDocument, ExampleDocument, LoggingDocument, MessagesDocument, OrchestratorDocument,
    PromptsDocument,
};
use crate::env::ConfigEnv;
use crate::prompts;
use ragpolicy_domain::{
    ADVANCED_IMAGE_PROCESSING_TYPES, AssistantType, ChunkingSettings, ChunkingStrategy,
    ConversationalFlow, DocumentProcessingPolicy, DocumentType, LoadingSettings, LoadingStrategy,
    OrchestrationStrategy, PrimitiveError,
};

/// Default chunk size for every base policy.
pub const DEFAULT_CHUNK_SIZE: u32 = 500;
/// Default chunk overlap for every base policy.
pub const DEFAULT_CHUNK_OVERLAP: u32 = 100;

const BASE_TABLE: [(&str, ChunkingStrategy, LoadingStrategy); 13] = [
    ("pdf", ChunkingStrategy::Layout, LoadingStrategy::Layout),
    ("txt", ChunkingStrategy::Layout, LoadingStrategy::Web),
    ("url", ChunkingStrategy::Layout, LoadingStrategy::Web),
    ("md", ChunkingStrategy::Layout, LoadingStrategy::Web),
    ("html", ChunkingStrategy::Layout, LoadingStrategy::Web),
    ("htm", ChunkingStrategy::Layout, LoadingStrategy::Web),
    ("docx", ChunkingStrategy::Layout, LoadingStrategy::Docx),
    ("json", ChunkingStrategy::Json, LoadingStrategy::Web),
    ("jpg", ChunkingStrategy::Layout, LoadingStrategy::Layout),
    ("jpeg", ChunkingStrategy::Layout, LoadingStrategy::Layout),
    ("png", ChunkingStrategy::Layout, LoadingStrategy::Layout),
    ("tiff", ChunkingStrategy::Layout, LoadingStrategy::Layout),
    ("bmp", ChunkingStrategy::Layout, LoadingStrategy::Layout),
];

/// Builds the baseline configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultConfigBuilder {
    orchestration_strategy: OrchestrationStrategy,
    use_advanced_image_processing: bool,
}

impl Default for DefaultConfigBuilder {
    fn default() -> Self {
        Self::from_env(&ConfigEnv::default())
    }
}

impl DefaultConfigBuilder {
    /// Builder driven by environment settings.
    #[must_use]
    pub const fn from_env(env: &ConfigEnv) -> Self {
        Self {
            orchestration_strategy: env.orchestration_strategy,
            use_advanced_image_processing: env.use_advanced_image_processing,
        }
    }

    /// Override the orchestration strategy.
    #[must_use]
    pub const fn orchestration_strategy(mut self, strategy: OrchestrationStrategy) -> Self {
        self.orchestration_strategy = strategy;
        self
    }

    /// Toggle the advanced image processing entries.
    #[must_use]
    pub const fn use_advanced_image_processing(mut self, enabled: bool) -> Self {
        self.use_advanced_image_processing = enabled;
        self
    }

    /// Build the full default document. Every field is present.
    pub fn build(&self) -> Result<ConfigDocument, PrimitiveError> {
        Ok(ConfigDocument {
            prompts: Some(default_prompts()),
            messages: Some(MessagesDocument {
                post_answering_filter: Some(prompts::POST_ANSWERING_FILTER_MESSAGE.to_owned()),
            }),
            example: Some(ExampleDocument {
                documents: Some(prompts::EXAMPLE_DOCUMENTS.to_owned()),
                user_question: Some(prompts::EXAMPLE_USER_QUESTION.to_owned()),
                answer: Some(prompts::EXAMPLE_ANSWER.to_owned()),
            }),
            document_processors: Some(self.document_processors()?),
            logging: Some(LoggingDocument {
                log_user_interactions: Some(true),
                log_tokens: Some(true),
            }),
            orchestrator: Some(OrchestratorDocument {
                strategy: Some(self.orchestration_strategy),
            }),
            integrated_vectorization_config: None,
            enable_chat_history: Some(true),
        })
    }

    /// Build the ordered default policy sequence.
    pub fn document_processors(&self) -> Result<Vec<DocumentProcessingPolicy>, PrimitiveError> {
        let mut processors = BASE_TABLE
            .iter()
            .map(|(document_type, chunking, loading)| base_policy(document_type, *chunking, *loading))
            .collect::<Result<Vec<_>, _>>()?;

        if self.use_advanced_image_processing {
            for image_type in ADVANCED_IMAGE_PROCESSING_TYPES {
                let policy = base_policy(image_type, ChunkingStrategy::Layout, LoadingStrategy::Layout)?;
                processors.push(policy.into_advanced_image_processing());
            }
        }

        Ok(processors)
    }
}

fn base_policy(
    document_type: &str,
    chunking: ChunkingStrategy,
    loading: LoadingStrategy,
) -> Result<DocumentProcessingPolicy, PrimitiveError> {
    Ok(DocumentProcessingPolicy::new(
        DocumentType::parse(document_type)?,
        ChunkingSettings::new(chunking, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP),
        LoadingSettings::new(loading),
    ))
}

fn default_prompts() -> PromptsDocument {
    PromptsDocument {
        condense_question_prompt: Some(prompts::CONDENSE_QUESTION_PROMPT.to_owned()),
        answering_system_prompt: Some(prompts::ANSWERING_SYSTEM_PROMPT.to_owned()),
        answering_user_prompt: Some(prompts::ANSWERING_USER_PROMPT.to_owned()),
        answering_prompt: Some(prompts::LEGACY_ANSWERING_PROMPT.to_owned()),
        post_answering_prompt: Some(prompts::POST_ANSWERING_PROMPT.to_owned()),
        use_on_your_data_format: Some(true),
        enable_post_answering_prompt: Some(false),
        enable_content_safety: Some(true),
        ai_assistant_type: Some(AssistantType::Default),
        conversational_flow: Some(ConversationalFlow::Custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn image_entries(
        processors: &[DocumentProcessingPolicy],
        image_type: &str,
    ) -> Vec<DocumentProcessingPolicy> {
        processors
            .iter()
            .filter(|policy| policy.document_type.as_str() == image_type)
            .cloned()
            .collect()
    }

    #[test]
    fn disabled_flag_yields_one_plain_entry_per_image_type() -> Result<(), Box<dyn Error>> {
        let processors = DefaultConfigBuilder::default()
            .use_advanced_image_processing(false)
            .document_processors()?;

        assert_eq!(processors.len(), BASE_TABLE.len());
        for image_type in ADVANCED_IMAGE_PROCESSING_TYPES {
            let entries = image_entries(&processors, image_type);
            assert_eq!(entries.len(), 1, "{image_type}");
            assert!(entries.iter().all(|entry| !entry.use_advanced_image_processing));
        }
        Ok(())
    }

    #[test]
    fn enabled_flag_appends_advanced_entry_per_image_type() -> Result<(), Box<dyn Error>> {
        let processors = DefaultConfigBuilder::default()
            .use_advanced_image_processing(true)
            .document_processors()?;

        assert_eq!(
            processors.len(),
            BASE_TABLE.len() + ADVANCED_IMAGE_PROCESSING_TYPES.len()
        );
        for image_type in ADVANCED_IMAGE_PROCESSING_TYPES {
            let entries = image_entries(&processors, image_type);
            assert_eq!(entries.len(), 2, "{image_type}");
            let (plain, advanced) = (&entries[0], &entries[1]);
            assert!(!plain.use_advanced_image_processing);
            assert!(advanced.use_advanced_image_processing);
            assert_eq!(advanced.loading.strategy, LoadingStrategy::Layout);
        }

        let appended: Vec<&str> = processors[BASE_TABLE.len()..]
            .iter()
            .map(|policy| policy.document_type.as_str())
            .collect();
        assert_eq!(appended, ADVANCED_IMAGE_PROCESSING_TYPES);
        Ok(())
    }

    #[test]
    fn base_table_matches_expected_strategies() -> Result<(), Box<dyn Error>> {
        let processors = DefaultConfigBuilder::default().document_processors()?;
        let json = processors
            .iter()
            .find(|policy| policy.document_type.as_str() == "json")
            .ok_or("json policy missing")?;
        assert_eq!(json.chunking.strategy, ChunkingStrategy::Json);
        assert_eq!(json.loading.strategy, LoadingStrategy::Web);

        assert!(processors.iter().all(|policy| {
            policy.chunking.size == DEFAULT_CHUNK_SIZE
                && policy.chunking.overlap == DEFAULT_CHUNK_OVERLAP
        }));
        Ok(())
    }

    #[test]
    fn default_document_is_complete_and_uses_env_orchestrator() -> Result<(), Box<dyn Error>> {
        let env = ConfigEnv {
            orchestration_strategy: OrchestrationStrategy::PromptFlow,
            ..ConfigEnv::default()
        };
        let document = DefaultConfigBuilder::from_env(&env).build()?;

        assert_eq!(
            document.orchestrator.and_then(|orchestrator| orchestrator.strategy),
            Some(OrchestrationStrategy::PromptFlow)
        );
        assert_eq!(document.enable_chat_history, Some(true));
        assert_eq!(document.integrated_vectorization_config, None);

        let prompt_section = document.prompts.ok_or("prompts missing")?;
        assert_eq!(prompt_section.use_on_your_data_format, Some(true));
        assert_eq!(
            prompt_section.answering_prompt.as_deref(),
            Some(prompts::LEGACY_ANSWERING_PROMPT)
        );
        Ok(())
    }
}
