//! Hosted object-store client.
//!
//! Uploads are multipart POSTs.  The payload is staged to a named temp file
//! and streamed from disk, so a large blob never sits in memory twice; the
//! temp file is removed when its handle drops, on success and failure alike.

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use async_trait::async_trait;

use crate::blob_store::{validate_object_name, BlobStore};
use crate::config::BlobStoreConfig;
use crate::error::{DownloadError, UploadError};

pub struct HttpBlobStore {
    client: reqwest::Client,
    config: BlobStoreConfig,
}

/// Upload response of the hosted store.  `secure_url` is preferred; some
/// deployments only return `url`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl HttpBlobStore {
    pub fn new(config: BlobStoreConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, data: &[u8], object_name: &str) -> Result<String, UploadError> {
        validate_object_name(object_name)?;

        // Stage to disk; `staging` lives until the request completes.
        let staging = NamedTempFile::new()?;
        tokio::fs::write(staging.path(), data).await?;

        let file = File::open(staging.path()).await?;
        let part = Part::stream_with_length(
            Body::wrap_stream(ReaderStream::new(file)),
            data.len() as u64,
        )
        .file_name(object_name.to_string())
        .mime_str("application/octet-stream")?;

        let object_id = format!("{}/{}", self.config.folder, object_name);
        let mut form = Form::new()
            .text("public_id", object_id.clone())
            .part("file", part);
        if let Some(key) = &self.config.api_key {
            form = form.text("api_key", key.clone());
        }

        debug!(object = %object_id, size = data.len(), "uploading blob");

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResponse = response.json().await?;
        let locator = parsed
            .secure_url
            .or(parsed.url)
            .ok_or(UploadError::BadResponse)?;

        info!(object = %object_id, locator = %locator, "blob uploaded");
        Ok(locator)
    }

    async fn download(&self, locator: &str) -> Result<Vec<u8>, DownloadError> {
        debug!(locator = %locator, "downloading blob");

        let response = self.client.get(locator).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Name validation runs before any socket is touched, so a store pointed
    // at an unreachable endpoint still rejects traversal names fast.
    #[tokio::test]
    async fn test_traversal_name_rejected_without_network() {
        let store = HttpBlobStore::new(BlobStoreConfig {
            endpoint: "http://127.0.0.1:1/upload".to_string(),
            ..BlobStoreConfig::default()
        })
        .unwrap();

        let err = store.upload(b"data", "../escape").await.unwrap_err();
        assert!(matches!(err, UploadError::Rejected(_)));
    }
}
