use thiserror::Error;

/// Errors raised while pushing a blob to its store.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Local I/O failure while staging or writing the payload.
    #[error("Blob staging error: {0}")]
    Staging(#[from] std::io::Error),

    /// Transport-level failure (connect, TLS, body stream).
    #[error("Upload transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Upload rejected with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The store answered 2xx but the response carried no usable locator.
    #[error("Upload response missing blob locator")]
    BadResponse,

    /// Object name refused before any traffic (empty or path traversal).
    #[error("Invalid object name: {0}")]
    Rejected(String),

    /// The upload did not complete within the configured deadline.
    #[error("Upload timed out")]
    Timeout,
}

/// Errors raised while fetching a blob back.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Download transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed with HTTP {status}")]
    Status { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The locator does not belong to this backend.
    #[error("Unsupported blob locator: {0}")]
    BadLocator(String),

    /// The download did not complete within the configured deadline.
    #[error("Download timed out")]
    Timeout,
}
