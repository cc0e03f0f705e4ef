use thiserror::Error;

/// Errors produced by the ledger layer.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A record or event list failed to (de)serialize.
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A query expected exactly one record but found none.
    #[error("Record not found")]
    NotFound,

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Another thread panicked while holding the ledger lock.
    #[error("Ledger lock poisoned")]
    LockPoisoned,

    /// The operation did not complete within the configured deadline.
    #[error("Ledger operation timed out")]
    Timeout,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
