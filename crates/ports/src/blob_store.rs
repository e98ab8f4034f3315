//! Blob storage boundary contract.
//!
//! A key/value byte store addressed by `(container, name)`. Calls are
//! blocking; implementations own any retry, timeout or cancellation policy.

use ragpolicy_shared::{ErrorCode, ErrorEnvelope, Result};
use std::fmt;

/// Content type used for JSON blobs.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Validated blob address.
///
/// Both segments must be non-empty single path segments: no `/` or `\`,
/// and neither `.` nor `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlobKey {
    container: Box<str>,
    name: Box<str>,
}

impl BlobKey {
    /// Validate and build a blob key.
    pub fn new(container: impl AsRef<str>, name: impl AsRef<str>) -> Result<Self> {
        let container = validate_segment("container", container.as_ref())?;
        let name = validate_segment("name", name.as_ref())?;
        Ok(Self {
            container: container.into(),
            name: name.into(),
        })
    }

    /// Logical container name.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Blob name inside the container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.container, self.name)
    }
}

fn validate_segment<'a>(field: &'static str, input: &'a str) -> Result<&'a str> {
    let trimmed = input.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\']);
    if invalid {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("ports", "invalid_blob_key"),
            format!("blob {field} must be a single non-empty path segment"),
        )
        .with_metadata("field", field)
        .with_metadata("input", input));
    }
    Ok(trimmed)
}

/// Boundary contract for blob storage.
pub trait BlobStorePort: Send + Sync {
    /// Returns true when a blob is stored under the key.
    fn exists(&self, key: &BlobKey) -> Result<bool>;

    /// Read the full blob. Missing blobs are an error.
    fn download(&self, key: &BlobKey) -> Result<Vec<u8>>;

    /// Create or overwrite a blob.
    fn upload(&self, key: &BlobKey, bytes: &[u8], content_type: &str) -> Result<()>;

    /// Remove a blob.
    fn delete(&self, key: &BlobKey) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_key_trims_segments() -> Result<()> {
        let key = BlobKey::new(" config ", "active.json")?;
        assert_eq!(key.container(), "config");
        assert_eq!(key.name(), "active.json");
        assert_eq!(key.to_string(), "config/active.json");
        Ok(())
    }

    #[test]
    fn blob_key_rejects_traversal_and_separators() {
        for (container, name) in [("", "a"), ("config", ".."), ("a/b", "c"), ("config", "x\\y")] {
            let error = BlobKey::new(container, name).err();
            assert!(
                matches!(&error, Some(envelope) if envelope.code.code() == "invalid_blob_key"),
                "accepted {container:?}/{name:?}"
            );
        }
    }
}
