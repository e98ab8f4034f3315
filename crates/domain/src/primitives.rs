//! Domain primitives with validated constructors.

use ragpolicy_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image extensions that may opt into advanced image processing.
pub const ADVANCED_IMAGE_PROCESSING_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "tiff", "bmp"];

/// Validation failures for domain primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// `DocumentType` is empty after trimming.
    EmptyDocumentType {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `DocumentType` contains characters outside `[a-z0-9_-]`.
    InvalidDocumentType {
        /// Normalized token that failed validation.
        input: String,
    },
}

impl PrimitiveError {
    fn error_code() -> ErrorCode {
        ErrorCode::new("domain", "invalid_document_type")
    }
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDocumentType { .. } => formatter.write_str("DocumentType must be non-empty"),
            Self::InvalidDocumentType { input } => write!(
                formatter,
                "DocumentType `{input}` must match /^[a-z0-9_-]+$/"
            ),
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<PrimitiveError> for ErrorEnvelope {
    fn from(error: PrimitiveError) -> Self {
        let envelope = Self::expected(PrimitiveError::error_code(), error.to_string());
        match error {
            PrimitiveError::EmptyDocumentType { input_length } => {
                envelope.with_metadata("input_length", input_length.to_string())
            },
            PrimitiveError::InvalidDocumentType { input } => envelope.with_metadata("input", input),
        }
    }
}

/// Lowercase file-extension-like token identifying a document type (`pdf`, `md`, `jpeg`).
///
/// Parsing trims whitespace, drops a single leading dot and lowercases ASCII,
/// so `".PDF"` and `"pdf"` name the same type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentType(Box<str>);

impl DocumentType {
    /// Parse a `DocumentType` from user input.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let raw = input.as_ref();
        let trimmed = raw.trim();
        let token = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if token.is_empty() {
            return Err(PrimitiveError::EmptyDocumentType {
                input_length: raw.len(),
            });
        }

        let normalized = token.to_ascii_lowercase();
        if !normalized
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(PrimitiveError::InvalidDocumentType { input: normalized });
        }

        Ok(Self(normalized.into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the image types that support advanced image processing.
    #[must_use]
    pub fn supports_advanced_image_processing(&self) -> bool {
        ADVANCED_IMAGE_PROCESSING_TYPES.contains(&self.as_str())
    }
}

impl AsRef<str> for DocumentType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<String> for DocumentType {
    type Error = PrimitiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DocumentType> for String {
    fn from(value: DocumentType) -> Self {
        value.0.into_string()
    }
}
