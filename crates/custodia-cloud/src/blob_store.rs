use async_trait::async_trait;

use crate::error::{DownloadError, UploadError};

/// Client interface of an opaque blob store.
///
/// Callers hand implementations ciphertext and get back a stable locator URI
/// that any later [`download`](Self::download) accepts.  Implementations never
/// see plaintext and never retry internally; retry policy belongs to the
/// caller.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `data` under `object_name`, returning the blob's locator.
    async fn upload(&self, data: &[u8], object_name: &str) -> Result<String, UploadError>;

    /// Fetch a blob by the locator a previous upload returned.
    async fn download(&self, locator: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Reject object names that could escape the store's namespace.
pub(crate) fn validate_object_name(name: &str) -> Result<(), UploadError> {
    if name.is_empty() {
        return Err(UploadError::Rejected("empty object name".to_string()));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(UploadError::Rejected(format!(
            "path traversal detected in '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_accepted() {
        assert!(validate_object_name("20240105_100000_AAAAAAAAAAA_report.pdf").is_ok());
    }

    #[test]
    fn test_traversal_rejected() {
        for bad in ["", "../secret", "a/b", "a\\b", "tricky..name"] {
            assert!(
                matches!(validate_object_name(bad), Err(UploadError::Rejected(_))),
                "expected rejection for {bad:?}"
            );
        }
    }
}
