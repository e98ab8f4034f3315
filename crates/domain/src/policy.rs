//! Per-document-type processing policies.

use crate::primitives::DocumentType;
use crate::strategies::{ChunkingStrategy, LoadingStrategy};
use serde::{Deserialize, Serialize};

/// Chunking parameters for a document type.
///
/// `overlap < size` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Chunking strategy.
    pub strategy: ChunkingStrategy,
    /// Target chunk size.
    pub size: u32,
    /// Overlap between consecutive chunks.
    pub overlap: u32,
}

impl ChunkingSettings {
    /// Build chunking settings.
    #[must_use]
    pub const fn new(strategy: ChunkingStrategy, size: u32, overlap: u32) -> Self {
        Self {
            strategy,
            size,
            overlap,
        }
    }

    /// Returns true when the overlap is smaller than the chunk size.
    #[must_use]
    pub const fn has_consistent_overlap(&self) -> bool {
        self.overlap < self.size
    }
}

/// Loading parameters for a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingSettings {
    /// Loading strategy.
    pub strategy: LoadingStrategy,
}

impl LoadingSettings {
    /// Build loading settings.
    #[must_use]
    pub const fn new(strategy: LoadingStrategy) -> Self {
        Self { strategy }
    }
}

/// Processing policy governing one document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProcessingPolicy {
    /// Document type the policy applies to.
    pub document_type: DocumentType,
    /// Chunking settings.
    pub chunking: ChunkingSettings,
    /// Loading settings.
    pub loading: LoadingSettings,
    /// Whether advanced image processing is requested for this type.
    #[serde(default)]
    pub use_advanced_image_processing: bool,
}

impl DocumentProcessingPolicy {
    /// Build a non-advanced policy.
    #[must_use]
    pub const fn new(
        document_type: DocumentType,
        chunking: ChunkingSettings,
        loading: LoadingSettings,
    ) -> Self {
        Self {
            document_type,
            chunking,
            loading,
            use_advanced_image_processing: false,
        }
    }

    /// Return a copy flagged for advanced image processing with loading forced to `layout`.
    #[must_use]
    pub fn into_advanced_image_processing(mut self) -> Self {
        self.use_advanced_image_processing = true;
        self.loading = LoadingSettings::new(LoadingStrategy::Layout);
        self
    }

    /// Returns true when the advanced flag is set on a type that cannot honour it.
    #[must_use]
    pub fn violates_advanced_image_constraint(&self) -> bool {
        self.use_advanced_image_processing
            && !self.document_type.supports_advanced_image_processing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PrimitiveError;

    fn policy(document_type: &str) -> Result<DocumentProcessingPolicy, PrimitiveError> {
        Ok(DocumentProcessingPolicy::new(
            DocumentType::parse(document_type)?,
            ChunkingSettings::new(ChunkingStrategy::Layout, 500, 100),
            LoadingSettings::new(LoadingStrategy::Read),
        ))
    }

    #[test]
    fn advanced_copy_forces_layout_loading() -> Result<(), PrimitiveError> {
        let advanced = policy("png")?.into_advanced_image_processing();
        assert!(advanced.use_advanced_image_processing);
        assert_eq!(advanced.loading.strategy, LoadingStrategy::Layout);
        assert!(!advanced.violates_advanced_image_constraint());
        Ok(())
    }

    #[test]
    fn advanced_flag_on_text_violates_constraint() -> Result<(), PrimitiveError> {
        let mut text = policy("txt")?;
        assert!(!text.violates_advanced_image_constraint());
        text.use_advanced_image_processing = true;
        assert!(text.violates_advanced_image_constraint());
        Ok(())
    }

    #[test]
    fn missing_advanced_flag_defaults_to_false() -> Result<(), serde_json::Error> {
        let decoded: DocumentProcessingPolicy = serde_json::from_value(serde_json::json!({
            "document_type": "pdf",
            "chunking": {"strategy": "page", "size": 800, "overlap": 900},
            "loading": {"strategy": "layout"}
        }))?;
        assert!(!decoded.use_advanced_image_processing);
        assert_eq!(decoded.chunking.strategy, ChunkingStrategy::Page);
        assert!(!decoded.chunking.has_consistent_overlap());
        Ok(())
    }
}
