//! The [`ProvenanceLedger`] trait and its SQLite-backed implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::database::Database;
use crate::error::{LedgerError, Result};
use crate::models::{AccessEvent, RecordId, ShareEvent, TrackedFileRecord};

/// Append-only chain-of-custody store.
///
/// Implementations must make each append atomic and order-preserving:
/// concurrent appends may interleave between records, but no event is ever
/// lost, reordered within its list, or rewritten.
#[async_trait]
pub trait ProvenanceLedger: Send + Sync {
    /// Persist a new record, returning its ledger-assigned id.
    async fn create_record(&self, record: &TrackedFileRecord) -> Result<RecordId>;

    /// Fetch one record by id.  [`LedgerError::NotFound`] when absent.
    async fn get_record(&self, id: &RecordId) -> Result<TrackedFileRecord>;

    /// All records owned by `owner_id`, oldest first.  Empty, not an error,
    /// when the owner has none.
    async fn query_by_owner(&self, owner_id: &str)
        -> Result<Vec<(RecordId, TrackedFileRecord)>>;

    /// Append one entry to a record's access trail.
    async fn append_access_event(&self, id: &RecordId, event: &AccessEvent) -> Result<()>;

    /// Append one link to a record's share chain.
    async fn append_share_event(&self, id: &RecordId, event: &ShareEvent) -> Result<()>;
}

/// [`ProvenanceLedger`] backed by the local SQLite database.
///
/// SQLite's transactional write is the atomic-append primitive; the mutex
/// serializes connection use across tasks.  Lock hold times are short (no
/// awaits while held), so a std mutex is sufficient.
pub struct SqliteLedger {
    db: Mutex<Database>,
}

impl SqliteLedger {
    /// Open the ledger in the platform data directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::new()?),
        })
    }

    /// Open the ledger at an explicit database path.
    pub fn open_at(path: &Path) -> Result<Self> {
        Ok(Self {
            db: Mutex::new(Database::open_at(path)?),
        })
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| LedgerError::LockPoisoned)
    }
}

#[async_trait]
impl ProvenanceLedger for SqliteLedger {
    async fn create_record(&self, record: &TrackedFileRecord) -> Result<RecordId> {
        let id = RecordId::new();
        self.db()?.insert_record(&id, record)?;

        debug!(id = %id, owner = %record.owner_id, "created ledger record");
        Ok(id)
    }

    async fn get_record(&self, id: &RecordId) -> Result<TrackedFileRecord> {
        self.db()?.get_record(id)
    }

    async fn query_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<(RecordId, TrackedFileRecord)>> {
        self.db()?.records_by_owner(owner_id)
    }

    async fn append_access_event(&self, id: &RecordId, event: &AccessEvent) -> Result<()> {
        self.db()?.append_access_event(id, event)?;

        debug!(id = %id, action = %event.action, "appended access event");
        Ok(())
    }

    async fn append_share_event(&self, id: &RecordId, event: &ShareEvent) -> Result<()> {
        self.db()?.append_share_event(id, event)?;

        debug!(id = %id, shared_with = %event.shared_with, "appended share event");
        Ok(())
    }
}
