/// AES-128-EAX key size in bytes
pub const KEY_SIZE: usize = 16;

/// AES-128-EAX nonce size in bytes
pub const NONCE_SIZE: usize = 16;

/// AES-128-EAX authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Length of the `nonce || tag` prefix of a serialized encrypted payload
pub const HEADER_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Random bytes in the uniqueness token of a secure filename
pub const FILENAME_TOKEN_BYTES: usize = 8;

/// Timestamp prefix format for secure filenames
pub const FILENAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format for ledger documents. Lexicographic order of these
/// strings equals chronological order, which history sorting relies on.
pub const LEDGER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Location string recorded when the resolver cannot produce one
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Bytes read when probing a file for readability before sharing
pub const VALIDATION_PROBE_BYTES: usize = 1024;

/// Default object-name prefix for uploaded blobs
pub const DEFAULT_BLOB_FOLDER: &str = "secure_pdfs";
