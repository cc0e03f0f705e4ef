use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::blob_store::{validate_object_name, BlobStore};
use crate::error::{DownloadError, UploadError};

/// Filesystem-backed [`BlobStore`] for development, self-hosted deployments,
/// and tests.  Locators are `file://` URIs under the base directory.
pub struct FsBlobStore {
    base_path: PathBuf,
}

/// Verify that a caller-supplied locator path stays within the base
/// directory.  Prevents traversal through crafted locators.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, DownloadError> {
    // Canonicalize base so symlinked temp dirs compare equal
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let relative = target
        .strip_prefix(&canonical_base)
        .or_else(|_| target.strip_prefix(base))
        .map_err(|_| DownloadError::BadLocator(target.display().to_string()))?;

    let mut resolved = canonical_base.clone();
    for component in relative.components() {
        match component {
            std::path::Component::Normal(c) => resolved.push(c),
            std::path::Component::ParentDir => {
                return Err(DownloadError::BadLocator(target.display().to_string()));
            }
            _ => {} // RootDir, CurDir, Prefix
        }
    }
    if !resolved.starts_with(&canonical_base) {
        return Err(DownloadError::BadLocator(target.display().to_string()));
    }
    Ok(resolved)
}

impl FsBlobStore {
    /// Create the store, creating `base_path` if missing.
    pub async fn new(base_path: PathBuf) -> Result<Self, UploadError> {
        fs::create_dir_all(&base_path).await?;

        info!(path = %base_path.display(), "filesystem blob store initialized");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(&self, data: &[u8], object_name: &str) -> Result<String, UploadError> {
        validate_object_name(object_name)?;

        let path = self.base_path.join(object_name);
        fs::write(&path, data).await?;

        debug!(object = %object_name, size = data.len(), "stored blob");
        Ok(format!("file://{}", path.display()))
    }

    async fn download(&self, locator: &str) -> Result<Vec<u8>, DownloadError> {
        let raw = locator
            .strip_prefix("file://")
            .ok_or_else(|| DownloadError::BadLocator(locator.to_string()))?;
        let path = ensure_within(&self.base_path, Path::new(raw))?;

        Ok(fs::read(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (FsBlobStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_upload_and_download() {
        let (store, _dir) = test_store().await;
        let data = b"opaque-encrypted-bytes";

        let locator = store.upload(data, "blob-1.bin").await.unwrap();
        assert!(locator.starts_with("file://"));

        let fetched = store.download(&locator).await.unwrap();
        assert_eq!(fetched, data);
    }

    #[tokio::test]
    async fn test_locator_is_stable() {
        let (store, _dir) = test_store().await;

        let locator = store.upload(b"v1", "stable.bin").await.unwrap();
        for _ in 0..3 {
            assert_eq!(store.download(&locator).await.unwrap(), b"v1");
        }
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (store, _dir) = test_store().await;

        assert!(matches!(
            store.upload(b"x", "../outside").await,
            Err(UploadError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_foreign_locator_rejected() {
        let (store, _dir) = test_store().await;

        assert!(matches!(
            store.download("https://example.com/blob").await,
            Err(DownloadError::BadLocator(_))
        ));
    }

    #[tokio::test]
    async fn test_locator_outside_base_rejected() {
        let (store, _dir) = test_store().await;
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.bin");
        fs::write(&secret, b"not ours to serve").await.unwrap();

        let locator = format!("file://{}", secret.display());
        assert!(matches!(
            store.download(&locator).await,
            Err(DownloadError::BadLocator(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_locator_rejected() {
        let (store, dir) = test_store().await;

        let locator = format!("file://{}/../escape.bin", dir.path().display());
        assert!(matches!(
            store.download(&locator).await,
            Err(DownloadError::BadLocator(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_blob_is_io_error() {
        let (store, dir) = test_store().await;
        let locator = format!("file://{}/never-written", dir.path().display());

        assert!(matches!(
            store.download(&locator).await,
            Err(DownloadError::Io(_))
        ));
    }
}
