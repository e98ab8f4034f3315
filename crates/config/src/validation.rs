//! Checks applied to a candidate configuration before it is persisted.
//!
//! Only the advanced-image-processing constraint is enforced. The check runs
//! on the raw mapping so that it fails before any decoding or storage call.

use ragpolicy_domain::{ADVANCED_IMAGE_PROCESSING_TYPES, DocumentType};
use ragpolicy_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Rejection of a candidate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Advanced image processing requested for a non-image document type.
    AdvancedImageProcessingUnsupported {
        /// Offending document type, as written in the candidate.
        document_type: String,
    },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdvancedImageProcessingUnsupported { document_type } => write!(
                formatter,
                "Advanced image processing has not been enabled for document type {document_type}, as only {} file types are supported.",
                supported_types_list()
            ),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl From<ConfigValidationError> for ErrorEnvelope {
    fn from(error: ConfigValidationError) -> Self {
        let message = error.to_string();
        match error {
            ConfigValidationError::AdvancedImageProcessingUnsupported { document_type } => {
                Self::expected(
                    ErrorCode::new("config", "unsupported_advanced_image_processing"),
                    message,
                )
                .with_metadata("document_type", document_type)
                .with_metadata("supported_types", ADVANCED_IMAGE_PROCESSING_TYPES.join(","))
            },
        }
    }
}

/// Renders the supported set as `['jpeg', 'jpg', 'png', 'tiff', 'bmp']`.
fn supported_types_list() -> String {
    let quoted: Vec<String> = ADVANCED_IMAGE_PROCESSING_TYPES
        .iter()
        .map(|image_type| format!("'{image_type}'"))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Reject candidates that request advanced image processing for non-image types.
///
/// Entries are checked in order and the first violation is reported. A
/// missing or non-array `document_processors` passes.
pub fn validate_advanced_image_processing(
    candidate: &serde_json::Value,
) -> Result<(), ConfigValidationError> {
    let Some(processors) = candidate
        .get("document_processors")
        .and_then(serde_json::Value::as_array)
    else {
        return Ok(());
    };

    for processor in processors {
        let advanced = processor
            .get("use_advanced_image_processing")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !advanced {
            continue;
        }

        let raw_type = processor
            .get("document_type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        let supported = DocumentType::parse(raw_type)
            .is_ok_and(|document_type| document_type.supports_advanced_image_processing());
        if !supported {
            return Err(ConfigValidationError::AdvancedImageProcessingUnsupported {
                document_type: raw_type.to_owned(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_advanced_flag_on_text_with_exact_message() {
        let candidate = json!({
            "document_processors": [{
                "document_type": "txt",
                "chunking": {"strategy": "layout", "size": 500, "overlap": 100},
                "loading": {"strategy": "web"},
                "use_advanced_image_processing": true
            }]
        });

        let error = validate_advanced_image_processing(&candidate).err();
        assert_eq!(
            error.map(|error| error.to_string()).as_deref(),
            Some(
                "Advanced image processing has not been enabled for document type txt, as only ['jpeg', 'jpg', 'png', 'tiff', 'bmp'] file types are supported."
            )
        );
    }

    #[test]
    fn accepts_image_types_and_non_advanced_entries() {
        let candidate = json!({
            "document_processors": [
                {"document_type": "PNG", "use_advanced_image_processing": true},
                {"document_type": "txt", "use_advanced_image_processing": false},
                {"document_type": "pdf"}
            ]
        });
        assert_eq!(validate_advanced_image_processing(&candidate), Ok(()));
        assert_eq!(validate_advanced_image_processing(&json!({})), Ok(()));
    }

    #[test]
    fn envelope_carries_type_and_supported_set() {
        let envelope: ErrorEnvelope = ConfigValidationError::AdvancedImageProcessingUnsupported {
            document_type: "docx".to_string(),
        }
        .into();
        assert_eq!(envelope.code.code(), "unsupported_advanced_image_processing");
        assert_eq!(
            envelope.metadata.get("supported_types").map(String::as_str),
            Some("jpeg,jpg,png,tiff,bmp")
        );
        assert!(envelope.message.contains("document type docx"));
    }
}
