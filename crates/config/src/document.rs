//! Persisted configuration document.
//!
//! Every field is optional so that absence survives decoding: migration and
//! default filling need to tell "not stored" apart from "stored as false".
//! JSON `null` decodes as absent. Unknown keys are ignored.

use ragpolicy_domain::{AssistantType, ConversationalFlow, DocumentProcessingPolicy, OrchestrationStrategy};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Field-by-field merge that keeps present values and takes the rest from defaults.
pub trait FillFrom {
    /// Fill absent fields from `defaults`. Present fields are never overridden.
    #[must_use]
    fn fill_from(self, defaults: &Self) -> Self;
}

fn fill_nested<T: FillFrom + Clone>(value: Option<T>, defaults: Option<&T>) -> Option<T> {
    match (value, defaults) {
        (Some(value), Some(defaults)) => Some(value.fill_from(defaults)),
        (Some(value), None) => Some(value),
        (None, defaults) => defaults.cloned(),
    }
}

fn fill_leaf<T: Clone>(value: Option<T>, defaults: Option<&T>) -> Option<T> {
    value.or_else(|| defaults.cloned())
}

/// Prompt settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptsDocument {
    /// Condense-question prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condense_question_prompt: Option<String>,
    /// Answering system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answering_system_prompt: Option<String>,
    /// Answering user prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answering_user_prompt: Option<String>,
    /// Pre-split answering prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answering_prompt: Option<String>,
    /// Post-answering fact-check prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_answering_prompt: Option<String>,
    /// Use the structured retrieved-documents message format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_on_your_data_format: Option<bool>,
    /// Run the post-answering prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_post_answering_prompt: Option<bool>,
    /// Run the content safety filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_content_safety: Option<bool>,
    /// Assistant persona.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_assistant_type: Option<AssistantType>,
    /// Conversation pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversational_flow: Option<ConversationalFlow>,
}

impl FillFrom for PromptsDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            condense_question_prompt: fill_leaf(
                self.condense_question_prompt,
                defaults.condense_question_prompt.as_ref(),
            ),
            answering_system_prompt: fill_leaf(
                self.answering_system_prompt,
                defaults.answering_system_prompt.as_ref(),
            ),
            answering_user_prompt: fill_leaf(
                self.answering_user_prompt,
                defaults.answering_user_prompt.as_ref(),
            ),
            answering_prompt: fill_leaf(self.answering_prompt, defaults.answering_prompt.as_ref()),
            post_answering_prompt: fill_leaf(
                self.post_answering_prompt,
                defaults.post_answering_prompt.as_ref(),
            ),
            use_on_your_data_format: self
                .use_on_your_data_format
                .or(defaults.use_on_your_data_format),
            enable_post_answering_prompt: self
                .enable_post_answering_prompt
                .or(defaults.enable_post_answering_prompt),
            enable_content_safety: self.enable_content_safety.or(defaults.enable_content_safety),
            ai_assistant_type: self.ai_assistant_type.or(defaults.ai_assistant_type),
            conversational_flow: self.conversational_flow.or(defaults.conversational_flow),
        }
    }
}

/// User-facing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesDocument {
    /// Message shown when the post-answering check rejects an answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_answering_filter: Option<String>,
}

impl FillFrom for MessagesDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            post_answering_filter: fill_leaf(
                self.post_answering_filter,
                defaults.post_answering_filter.as_ref(),
            ),
        }
    }
}

/// Few-shot example for prompt templating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDocument {
    /// Retrieved documents payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<String>,
    /// Example question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
    /// Example answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl FillFrom for ExampleDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            documents: fill_leaf(self.documents, defaults.documents.as_ref()),
            user_question: fill_leaf(self.user_question, defaults.user_question.as_ref()),
            answer: fill_leaf(self.answer, defaults.answer.as_ref()),
        }
    }
}

/// Interaction logging toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingDocument {
    /// Log user questions and answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_user_interactions: Option<bool>,
    /// Log token usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_tokens: Option<bool>,
}

impl FillFrom for LoggingDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            log_user_interactions: self.log_user_interactions.or(defaults.log_user_interactions),
            log_tokens: self.log_tokens.or(defaults.log_tokens),
        }
    }
}

/// Orchestrator selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorDocument {
    /// Orchestration strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<OrchestrationStrategy>,
}

impl FillFrom for OrchestratorDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            strategy: self.strategy.or(defaults.strategy),
        }
    }
}

/// Page sizing for the integrated vectorization pipeline.
///
/// Both values accept JSON numbers or numeric strings (`"800"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegratedVectorizationConfig {
    /// Maximum page length.
    #[serde(deserialize_with = "deserialize_lenient_u32")]
    pub max_page_length: u32,
    /// Overlap between pages.
    #[serde(deserialize_with = "deserialize_lenient_u32")]
    pub page_overlap_length: u32,
}

fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u32),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an unsigned integer, got `{text}`"))),
    }
}

/// Partial mirror of the aggregate configuration as stored in blob storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Prompt settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsDocument>,
    /// User-facing messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessagesDocument>,
    /// Few-shot example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<ExampleDocument>,
    /// Ordered policies. Replaced as a whole when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_processors: Option<Vec<DocumentProcessingPolicy>>,
    /// Interaction logging toggles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingDocument>,
    /// Orchestrator selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<OrchestratorDocument>,
    /// Integrated vectorization page sizing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrated_vectorization_config: Option<IntegratedVectorizationConfig>,
    /// Keep chat history between turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_chat_history: Option<bool>,
}

impl ConfigDocument {
    /// Borrow the prompts section when present.
    #[must_use]
    pub fn prompts(&self) -> Option<&PromptsDocument> {
        self.prompts.as_ref()
    }
}

impl FillFrom for ConfigDocument {
    fn fill_from(self, defaults: &Self) -> Self {
        Self {
            prompts: fill_nested(self.prompts, defaults.prompts.as_ref()),
            messages: fill_nested(self.messages, defaults.messages.as_ref()),
            example: fill_nested(self.example, defaults.example.as_ref()),
            document_processors: fill_leaf(
                self.document_processors,
                defaults.document_processors.as_ref(),
            ),
            logging: fill_nested(self.logging, defaults.logging.as_ref()),
            orchestrator: fill_nested(self.orchestrator, defaults.orchestrator.as_ref()),
            integrated_vectorization_config: self
                .integrated_vectorization_config
                .or(defaults.integrated_vectorization_config),
            enable_chat_history: self.enable_chat_history.or(defaults.enable_chat_history),
        }
    }
}
