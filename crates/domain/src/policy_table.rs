//! Ordered policy sequence with last-entry-wins lookup.
//!
//! Later entries shadow earlier ones with the same document type. The
//! shadowing index is computed once at construction.

use crate::policy::DocumentProcessingPolicy;
use crate::primitives::DocumentType;
use ragpolicy_shared::{ErrorCode, ErrorEnvelope};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Dispatch failure for an unknown document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyLookupError {
    /// No policy entry matches the requested document type.
    NotFound {
        /// Requested document type, as given by the caller.
        document_type: String,
    },
}

impl fmt::Display for PolicyLookupError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { document_type } => write!(
                formatter,
                "no document processor configured for document type `{document_type}`"
            ),
        }
    }
}

impl std::error::Error for PolicyLookupError {}

impl From<PolicyLookupError> for ErrorEnvelope {
    fn from(error: PolicyLookupError) -> Self {
        let message = error.to_string();
        match error {
            PolicyLookupError::NotFound { document_type } => Self::expected(
                ErrorCode::new("domain", "document_type_not_found"),
                message,
            )
            .with_metadata("document_type", document_type),
        }
    }
}

/// Ordered policies plus a derived index of the last entry per document type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyTable {
    entries: Vec<DocumentProcessingPolicy>,
    last_index: BTreeMap<DocumentType, usize>,
}

impl PolicyTable {
    /// Build a table from policies in declaration order.
    #[must_use]
    pub fn new(entries: Vec<DocumentProcessingPolicy>) -> Self {
        let last_index = entries
            .iter()
            .enumerate()
            .map(|(index, policy)| (policy.document_type.clone(), index))
            .collect();
        Self {
            entries,
            last_index,
        }
    }

    /// Resolve the governing policy for a raw document type token.
    pub fn get(&self, document_type: &str) -> Result<&DocumentProcessingPolicy, PolicyLookupError> {
        DocumentType::parse(document_type)
            .ok()
            .and_then(|parsed| self.lookup(&parsed))
            .ok_or_else(|| PolicyLookupError::NotFound {
                document_type: document_type.to_owned(),
            })
    }

    /// Resolve the governing policy for a parsed document type.
    #[must_use]
    pub fn lookup(&self, document_type: &DocumentType) -> Option<&DocumentProcessingPolicy> {
        self.last_index
            .get(document_type)
            .and_then(|index| self.entries.get(*index))
    }

    /// All entries, including shadowed ones, in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[DocumentProcessingPolicy] {
        &self.entries
    }

    /// Consume the table and return its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<DocumentProcessingPolicy> {
        self.entries
    }

    /// Distinct document types, sorted.
    ///
    /// Types backed only by advanced-image-processing entries are listed only
    /// when `include_advanced` is set.
    #[must_use]
    pub fn document_types(&self, include_advanced: bool) -> Vec<DocumentType> {
        self.entries
            .iter()
            .filter(|policy| include_advanced || !policy.use_advanced_image_processing)
            .map(|policy| policy.document_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of entries, including shadowed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DocumentProcessingPolicy> for PolicyTable {
    fn from_iter<I: IntoIterator<Item = DocumentProcessingPolicy>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
