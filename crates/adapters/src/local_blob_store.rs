//! Blob store backed by a local directory.
//!
//! Each container is a subdirectory of the root and each blob a file inside
//! it. Content types are not persisted.

use ragpolicy_ports::{BlobKey, BlobStorePort};
use ragpolicy_shared::{ErrorEnvelope, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Local filesystem blob store.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Store rooted at `root`. The directory is created lazily on first upload.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path backing a key.
    #[must_use]
    pub fn path_for(&self, key: &BlobKey) -> PathBuf {
        self.root.join(key.container()).join(key.name())
    }

    fn with_key(key: &BlobKey, error: io::Error) -> ErrorEnvelope {
        ErrorEnvelope::from(error)
            .with_metadata("container", key.container())
            .with_metadata("blob", key.name())
    }
}

impl BlobStorePort for LocalBlobStore {
    fn exists(&self, key: &BlobKey) -> Result<bool> {
        match fs::metadata(self.path_for(key)) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(Self::with_key(key, error)),
        }
    }

    fn download(&self, key: &BlobKey) -> Result<Vec<u8>> {
        fs::read(self.path_for(key)).map_err(|error| Self::with_key(key, error))
    }

    fn upload(&self, key: &BlobKey, body: &[u8], _content_type: &str) -> Result<()> {
        let path = self.path_for(key);
        let container_dir = self.root.join(key.container());
        fs::create_dir_all(&container_dir).map_err(|error| Self::with_key(key, error))?;

        // Write-then-rename so readers never observe a partial blob.
        let staging = container_dir.join(format!(".{}.tmp", key.name()));
        fs::write(&staging, body).map_err(|error| Self::with_key(key, error))?;
        fs::rename(&staging, &path).map_err(|error| Self::with_key(key, error))
    }

    fn delete(&self, key: &BlobKey) -> Result<()> {
        fs::remove_file(self.path_for(key)).map_err(|error| Self::with_key(key, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragpolicy_shared::ErrorCode;

    fn scratch_root(name: &str) -> PathBuf {
        let root =
            std::env::temp_dir().join(format!("ragpolicy_blob_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn upload_download_delete_cycle() -> Result<()> {
        let root = scratch_root("cycle");
        let store = LocalBlobStore::new(&root);
        let key = BlobKey::new("config", "active.json")?;

        assert!(!store.exists(&key)?);
        store.upload(&key, b"{\n  \"a\": 1\n}", "application/json")?;
        assert!(store.exists(&key)?);
        assert_eq!(store.download(&key)?, b"{\n  \"a\": 1\n}".to_vec());
        assert_eq!(store.path_for(&key), root.join("config").join("active.json"));

        store.upload(&key, b"{}", "application/json")?;
        assert_eq!(store.download(&key)?, b"{}".to_vec());

        store.delete(&key)?;
        assert!(!store.exists(&key)?);
        let _ = fs::remove_dir_all(&root);
        Ok(())
    }

    #[test]
    fn missing_blob_maps_to_not_found() -> Result<()> {
        let root = scratch_root("missing");
        let store = LocalBlobStore::new(&root);
        let key = BlobKey::new("config", "active.json")?;

        let download = store.download(&key).err();
        assert_eq!(
            download.as_ref().map(|error| error.code.clone()),
            Some(ErrorCode::not_found())
        );
        assert_eq!(
            download
                .as_ref()
                .and_then(|error| error.metadata.get("blob"))
                .map(String::as_str),
            Some("active.json")
        );

        let delete = store.delete(&key).err();
        assert_eq!(delete.map(|error| error.code), Some(ErrorCode::not_found()));
        Ok(())
    }
}
