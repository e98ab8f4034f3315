//! Closed sets of strategy and selector names.
//!
//! Each enum serializes to the exact token stored in persisted configuration
//! and exposes `ALL` in declaration order for "available strategies" listings.

use ragpolicy_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Failure to parse a strategy or selector token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParseError {
    /// Name of the enumeration being parsed (e.g. `chunking strategy`).
    pub kind: &'static str,
    /// Raw input that did not match any variant.
    pub input: String,
    /// Accepted tokens, in declaration order.
    pub expected: &'static [&'static str],
}

impl fmt::Display for StrategyParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "unknown {} `{}` (expected one of: {})",
            self.kind,
            self.input,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for StrategyParseError {}

impl From<StrategyParseError> for ErrorEnvelope {
    fn from(error: StrategyParseError) -> Self {
        Self::expected(ErrorCode::new("domain", "invalid_strategy"), error.to_string())
            .with_metadata("kind", error.kind)
            .with_metadata("input", error.input)
    }
}

fn parse_token<T: Copy>(
    kind: &'static str,
    input: &str,
    all: &[T],
    expected: &'static [&'static str],
    as_str: fn(T) -> &'static str,
) -> Result<T, StrategyParseError> {
    let trimmed = input.trim();
    all.iter()
        .copied()
        .find(|candidate| as_str(*candidate) == trimmed)
        .ok_or_else(|| StrategyParseError {
            kind,
            input: input.to_owned(),
            expected,
        })
}

/// How documents are split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Split along layout elements.
    Layout,
    /// One chunk per page.
    Page,
    /// Fixed-size windows with overlap.
    FixedSizeOverlap,
    /// One chunk per paragraph.
    Paragraph,
    /// Structural split of JSON documents.
    Json,
}

impl ChunkingStrategy {
    /// All variants in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Layout,
        Self::Page,
        Self::FixedSizeOverlap,
        Self::Paragraph,
        Self::Json,
    ];
    const NAMES: &'static [&'static str] =
        &["layout", "page", "fixed_size_overlap", "paragraph", "json"];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Page => "page",
            Self::FixedSizeOverlap => "fixed_size_overlap",
            Self::Paragraph => "paragraph",
            Self::Json => "json",
        }
    }
}

impl FromStr for ChunkingStrategy {
    type Err = StrategyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_token("chunking strategy", input, &Self::ALL, Self::NAMES, Self::as_str)
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// How raw documents are loaded before chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStrategy {
    /// Layout analysis (document intelligence).
    Layout,
    /// Plain OCR read.
    Read,
    /// Web page fetch and extraction.
    Web,
    /// Word document parsing.
    Docx,
}

impl LoadingStrategy {
    /// All variants in declaration order.
    pub const ALL: [Self; 4] = [Self::Layout, Self::Read, Self::Web, Self::Docx];
    const NAMES: &'static [&'static str] = &["layout", "read", "web", "docx"];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Read => "read",
            Self::Web => "web",
            Self::Docx => "docx",
        }
    }
}

impl FromStr for LoadingStrategy {
    type Err = StrategyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_token("loading strategy", input, &Self::ALL, Self::NAMES, Self::as_str)
    }
}

impl fmt::Display for LoadingStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Which orchestrator drives the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationStrategy {
    /// Native function calling.
    OpenaiFunction,
    /// `LangChain` agent.
    Langchain,
    /// Prompt flow endpoint.
    PromptFlow,
    /// Semantic kernel planner.
    SemanticKernel,
}

impl OrchestrationStrategy {
    /// All variants in declaration order.
    pub const ALL: [Self; 4] = [
        Self::OpenaiFunction,
        Self::Langchain,
        Self::PromptFlow,
        Self::SemanticKernel,
    ];
    const NAMES: &'static [&'static str] =
        &["openai_function", "langchain", "prompt_flow", "semantic_kernel"];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenaiFunction => "openai_function",
            Self::Langchain => "langchain",
            Self::PromptFlow => "prompt_flow",
            Self::SemanticKernel => "semantic_kernel",
        }
    }
}

impl FromStr for OrchestrationStrategy {
    type Err = StrategyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_token(
            "orchestration strategy",
            input,
            &Self::ALL,
            Self::NAMES,
            Self::as_str,
        )
    }
}

impl fmt::Display for OrchestrationStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Persona selecting the assistant system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssistantType {
    /// General-purpose assistant.
    #[serde(rename = "default")]
    Default,
    /// Contract review assistant.
    #[serde(rename = "contract assistant")]
    ContractAssistant,
    /// Employee handbook assistant.
    #[serde(rename = "employee assistant")]
    EmployeeAssistant,
}

impl AssistantType {
    /// All variants in declaration order.
    pub const ALL: [Self; 3] = [
        Self::Default,
        Self::ContractAssistant,
        Self::EmployeeAssistant,
    ];
    const NAMES: &'static [&'static str] = &["default", "contract assistant", "employee assistant"];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ContractAssistant => "contract assistant",
            Self::EmployeeAssistant => "employee assistant",
        }
    }
}

impl FromStr for AssistantType {
    type Err = StrategyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_token("assistant type", input, &Self::ALL, Self::NAMES, Self::as_str)
    }
}

impl fmt::Display for AssistantType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Conversation pipeline selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationalFlow {
    /// Orchestrator-driven flow.
    Custom,
    /// Bring-your-own-data flow handled by the model service.
    Byod,
}

impl ConversationalFlow {
    /// All variants in declaration order.
    pub const ALL: [Self; 2] = [Self::Custom, Self::Byod];
    const NAMES: &'static [&'static str] = &["custom", "byod"];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Byod => "byod",
        }
    }
}

impl FromStr for ConversationalFlow {
    type Err = StrategyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_token(
            "conversational flow",
            input,
            &Self::ALL,
            Self::NAMES,
            Self::as_str,
        )
    }
}

impl fmt::Display for ConversationalFlow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
