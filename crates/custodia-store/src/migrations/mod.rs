//! Ledger schema migrations.
//!
//! Every [`Database`](crate::database::Database) constructor runs the pending
//! migrations before handing out the connection; the `user_version` pragma
//! records how far this database has been upgraded, so each step runs exactly
//! once per file.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{LedgerError, Result};

/// Schema version this build writes.  Bump together with a new migration
/// module.
const CURRENT_VERSION: u32 = 1;

/// Bring the database up to [`CURRENT_VERSION`].
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let from: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if from >= CURRENT_VERSION {
        return Ok(());
    }

    tracing::info!(from, to = CURRENT_VERSION, "migrating ledger schema");

    if from < 1 {
        v001_initial::up(conn).map_err(|e| LedgerError::Migration(e.to_string()))?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    // Future steps slot in here:
    // if from < 2 { v002_xxx::up(conn)?; ... }

    Ok(())
}
