//! Domain model structs persisted in the provenance ledger.
//!
//! Every struct derives `Serialize` and `Deserialize` with field names and
//! value spellings matching the ledger documents, so records written by
//! earlier deployments deserialize unchanged.  Unknown document fields are
//! ignored; a missing `location` falls back to `"Unknown"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use custodia_shared::constants::UNKNOWN_LOCATION;
use custodia_shared::time::ledger_format;

// ---------------------------------------------------------------------------
// Record id
// ---------------------------------------------------------------------------

/// Ledger-assigned document identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Access level
// ---------------------------------------------------------------------------

/// Permission granted to a share recipient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessLevel {
    #[serde(rename = "View Only")]
    ViewOnly,
    #[serde(rename = "View and Share")]
    ViewAndShare,
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ViewOnly => write!(f, "View Only"),
            Self::ViewAndShare => write!(f, "View and Share"),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What a user did with a tracked file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Upload,
    View,
    Share,
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::View => write!(f, "view"),
            Self::Share => write!(f, "share"),
        }
    }
}

/// One entry in a record's access trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessEvent {
    pub user_id: String,
    pub action: AccessAction,
    #[serde(default = "unknown_location")]
    pub location: String,
    #[serde(with = "ledger_format")]
    pub time: DateTime<Utc>,
}

/// One link in a record's share chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareEvent {
    /// The user who granted the share.
    pub user_id: String,
    /// The user receiving access.
    pub shared_with: String,
    pub access_level: AccessLevel,
    #[serde(with = "ledger_format")]
    pub time: DateTime<Utc>,
    #[serde(default = "unknown_location")]
    pub location: String,
}

// ---------------------------------------------------------------------------
// Tracked file record
// ---------------------------------------------------------------------------

/// A tracked file's full chain-of-custody record.
///
/// `owner_id` never changes after creation and the event lists are
/// append-only; nothing in the ledger API rewrites or drops an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedFileRecord {
    /// Original file name as the owner knew it.
    pub file_name: String,
    /// Collision-free object name the blob was uploaded under.
    pub secure_filename: String,
    /// Absolute path of the source file on the owner's machine.
    pub original_path: String,
    pub owner_id: String,
    #[serde(with = "ledger_format")]
    pub uploaded_at: DateTime<Utc>,
    /// Lowercase hex of the per-file key.  Key custody is delegated to the
    /// ledger; anyone who can read the record can decrypt the blob.
    #[serde(rename = "encryption_key")]
    pub encryption_key_hex: String,
    /// Locator URI returned by the blob store at upload time.
    pub blob_locator: String,
    #[serde(default)]
    pub access_records: Vec<AccessEvent>,
    #[serde(default)]
    pub share_chain: Vec<ShareEvent>,
}

fn unknown_location() -> String {
    UNKNOWN_LOCATION.to_string()
}
