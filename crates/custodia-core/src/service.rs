//! The share orchestrator.
//!
//! [`ShareService`] wires the cipher, blob store, location resolver, and
//! provenance ledger into the full pipeline: validate, encrypt, upload,
//! record, and later fetch, view, and onward share.  The service owns no
//! state beyond its collaborators; every key lives only inside the single
//! operation that generated it and the record that stores it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tracing::{info, warn};

use custodia_cloud::{BlobStore, DownloadError, LocationResolver, UploadError};
use custodia_shared::constants::VALIDATION_PROBE_BYTES;
use custodia_shared::crypto::{self, EncryptedBlob};
use custodia_shared::filename::secure_filename;
use custodia_shared::time::ledger_now;
use custodia_store::{
    AccessAction, AccessEvent, AccessLevel, LedgerError, ProvenanceLedger, RecordId, ShareEvent,
    TrackedFileRecord,
};

use crate::error::{ledger_err, ShareError};
use crate::history::{flatten_history, HistoryEntry};

/// Orchestrator-level settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deadline applied independently to the upload, download, and ledger
    /// stages of each operation.
    /// Env: `CUSTODIA_TIMEOUT_SECS`
    /// Default: 30 s
    pub network_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            network_timeout: Duration::from_secs(30),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CUSTODIA_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => config.network_timeout = Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid CUSTODIA_TIMEOUT_SECS, using default");
                }
            }
        }

        config
    }
}

/// Outcome of a successful share: the ledger id plus the record as written.
#[derive(Debug, Clone, Serialize)]
pub struct SharedFile {
    pub record_id: RecordId,
    pub record: TrackedFileRecord,
}

pub struct ShareService {
    blobs: Arc<dyn BlobStore>,
    ledger: Arc<dyn ProvenanceLedger>,
    locations: Arc<dyn LocationResolver>,
    config: ServiceConfig,
}

impl ShareService {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        ledger: Arc<dyn ProvenanceLedger>,
        locations: Arc<dyn LocationResolver>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            blobs,
            ledger,
            locations,
            config,
        }
    }

    /// Share a file: validate and read it, encrypt under a fresh key, upload
    /// the ciphertext, and persist the initial chain-of-custody record.
    ///
    /// Upload and geolocation run concurrently; geolocation can never fail
    /// the operation.  A ledger failure after a successful upload returns
    /// [`ShareError::Persistence`] carrying the orphaned blob's locator.
    pub async fn share_file(
        &self,
        file_path: &Path,
        file_name: &str,
        owner_id: &str,
        recipient: &str,
        access_level: AccessLevel,
    ) -> Result<SharedFile, ShareError> {
        let plaintext = self.read_validated(file_path).await?;

        let (blob, key) = crypto::encrypt(&plaintext).map_err(ShareError::Encryption)?;
        let payload = blob.to_bytes();
        let object_name = secure_filename(file_name);

        let (upload_result, location) = tokio::join!(
            timeout(
                self.config.network_timeout,
                self.blobs.upload(&payload, &object_name),
            ),
            self.locations.resolve(),
        );
        let locator = match upload_result {
            Ok(result) => result?,
            Err(_) => return Err(ShareError::Upload(UploadError::Timeout)),
        };

        let now = ledger_now();
        let location = location.into_string();
        let record = TrackedFileRecord {
            file_name: file_name.to_string(),
            secure_filename: object_name,
            original_path: file_path.display().to_string(),
            owner_id: owner_id.to_string(),
            uploaded_at: now,
            encryption_key_hex: crypto::key_to_hex(&key),
            blob_locator: locator.clone(),
            access_records: vec![AccessEvent {
                user_id: owner_id.to_string(),
                action: AccessAction::Upload,
                location: location.clone(),
                time: now,
            }],
            share_chain: vec![ShareEvent {
                user_id: owner_id.to_string(),
                shared_with: recipient.to_string(),
                access_level,
                time: now,
                location,
            }],
        };

        let record_id = match timeout(
            self.config.network_timeout,
            self.ledger.create_record(&record),
        )
        .await
        {
            Ok(Ok(id)) => id,
            Ok(Err(source)) => {
                warn!(locator = %locator, error = %source, "ledger write failed after upload, blob orphaned");
                return Err(ShareError::Persistence {
                    source,
                    orphaned_locator: Some(locator),
                });
            }
            Err(_) => {
                warn!(locator = %locator, "ledger write timed out after upload, blob may be orphaned");
                return Err(ShareError::Persistence {
                    source: LedgerError::Timeout,
                    orphaned_locator: Some(locator),
                });
            }
        };

        info!(
            record_id = %record_id,
            file = %file_name,
            recipient = %recipient,
            locator = %record.blob_locator,
            "file shared"
        );

        Ok(SharedFile { record_id, record })
    }

    /// The owner's full activity feed, newest first.
    pub async fn load_access_history(
        &self,
        owner_id: &str,
    ) -> Result<Vec<HistoryEntry>, ShareError> {
        let records = self
            .ledger
            .query_by_owner(owner_id)
            .await
            .map_err(ledger_err)?;

        Ok(flatten_history(records))
    }

    /// Download a tracked file's blob and decrypt it with the recorded key.
    ///
    /// Any malformed payload, bad stored key, or tag failure surfaces as
    /// [`ShareError::Authentication`]; nothing is retried.
    pub async fn fetch_and_decrypt(&self, record_id: &RecordId) -> Result<Vec<u8>, ShareError> {
        let record = self
            .ledger
            .get_record(record_id)
            .await
            .map_err(ledger_err)?;

        let payload = match timeout(
            self.config.network_timeout,
            self.blobs.download(&record.blob_locator),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(ShareError::Download(DownloadError::Timeout)),
        };

        let blob = EncryptedBlob::from_bytes(&payload).map_err(ShareError::Authentication)?;
        let key =
            crypto::key_from_hex(&record.encryption_key_hex).map_err(ShareError::Authentication)?;
        let plaintext = crypto::decrypt(&key, &blob).map_err(ShareError::Authentication)?;

        info!(
            record_id = %record_id,
            file = %record.file_name,
            size = plaintext.len(),
            "file fetched and decrypted"
        );

        Ok(plaintext)
    }

    /// Record that `viewer_id` opened the file, stamped with the viewer's
    /// resolved location.
    pub async fn record_view(
        &self,
        record_id: &RecordId,
        viewer_id: &str,
    ) -> Result<AccessEvent, ShareError> {
        let location = self.locations.resolve().await;

        let event = AccessEvent {
            user_id: viewer_id.to_string(),
            action: AccessAction::View,
            location: location.into_string(),
            time: ledger_now(),
        };

        self.ledger
            .append_access_event(record_id, &event)
            .await
            .map_err(ledger_err)?;

        info!(record_id = %record_id, viewer = %viewer_id, "view recorded");
        Ok(event)
    }

    /// Extend the share chain to a new recipient.
    ///
    /// Permitted for the record owner and for users previously granted
    /// "View and Share"; everyone else gets [`ShareError::Forbidden`].
    pub async fn reshare(
        &self,
        record_id: &RecordId,
        sharer_id: &str,
        recipient: &str,
        access_level: AccessLevel,
    ) -> Result<ShareEvent, ShareError> {
        let record = self
            .ledger
            .get_record(record_id)
            .await
            .map_err(ledger_err)?;

        if !can_reshare(&record, sharer_id) {
            return Err(ShareError::Forbidden {
                user_id: sharer_id.to_string(),
            });
        }

        let location = self.locations.resolve().await.into_string();
        let now = ledger_now();

        // Mirror the upload+share pair written at creation: the act of
        // sharing is itself an access.
        let access = AccessEvent {
            user_id: sharer_id.to_string(),
            action: AccessAction::Share,
            location: location.clone(),
            time: now,
        };
        self.ledger
            .append_access_event(record_id, &access)
            .await
            .map_err(ledger_err)?;

        let share = ShareEvent {
            user_id: sharer_id.to_string(),
            shared_with: recipient.to_string(),
            access_level,
            time: now,
            location,
        };
        self.ledger
            .append_share_event(record_id, &share)
            .await
            .map_err(ledger_err)?;

        info!(
            record_id = %record_id,
            sharer = %sharer_id,
            recipient = %recipient,
            level = %access_level,
            "share chain extended"
        );

        Ok(share)
    }

    /// Check the file exists, is regular, and is readable, then read it.
    ///
    /// The 1 KiB probe read surfaces permission and device errors as a
    /// validation failure before any encryption or network work starts.
    async fn read_validated(&self, path: &Path) -> Result<Vec<u8>, ShareError> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            ShareError::Validation(format!("cannot stat '{}': {}", path.display(), e))
        })?;
        if !meta.is_file() {
            return Err(ShareError::Validation(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }

        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            ShareError::Validation(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let mut probe = vec![0u8; VALIDATION_PROBE_BYTES];
        file.read(&mut probe).await.map_err(|e| {
            ShareError::Validation(format!("cannot read '{}': {}", path.display(), e))
        })?;

        tokio::fs::read(path).await.map_err(|e| {
            ShareError::Validation(format!("cannot read '{}': {}", path.display(), e))
        })
    }
}

/// Owner may always extend the chain; a grantee only if some earlier link
/// granted them "View and Share".
fn can_reshare(record: &TrackedFileRecord, user_id: &str) -> bool {
    if record.owner_id == user_id {
        return true;
    }

    record
        .share_chain
        .iter()
        .any(|s| s.shared_with == user_id && s.access_level == AccessLevel::ViewAndShare)
}
