use thiserror::Error;

use custodia_cloud::{DownloadError, UploadError};
use custodia_shared::CryptoError;
use custodia_store::LedgerError;

/// Errors surfaced by [`ShareService`](crate::service::ShareService)
/// operations.  Each variant marks the pipeline stage that aborted; nothing
/// after that stage has been performed.
#[derive(Error, Debug)]
pub enum ShareError {
    /// The source file is missing, not a regular file, or unreadable.
    #[error("File validation failed: {0}")]
    Validation(String),

    #[error("Encryption failed: {0}")]
    Encryption(#[source] CryptoError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// The fetched payload failed authentication: malformed layout, bad
    /// stored key, or tampered ciphertext.  Never retried.
    #[error("File corrupted or tampered: {0}")]
    Authentication(#[source] CryptoError),

    /// A ledger operation failed.  When an upload already succeeded, the
    /// locator of the now-orphaned blob is carried so callers can clean up.
    #[error("Ledger operation failed: {source}")]
    Persistence {
        #[source]
        source: LedgerError,
        orphaned_locator: Option<String>,
    },

    /// No record with the given id.
    #[error("Record not found")]
    NotFound,

    /// The acting user holds no right to extend this file's share chain.
    #[error("User '{user_id}' is not permitted to share this file")]
    Forbidden { user_id: String },
}

/// Ledger errors outside the post-upload window map here: absence is its own
/// kind, everything else is a persistence failure with no orphan.
pub(crate) fn ledger_err(source: LedgerError) -> ShareError {
    match source {
        LedgerError::NotFound => ShareError::NotFound,
        other => ShareError::Persistence {
            source: other,
            orphaned_locator: None,
        },
    }
}
