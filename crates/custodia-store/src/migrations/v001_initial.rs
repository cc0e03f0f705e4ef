//! v001 -- Initial schema creation.
//!
//! Creates the single `secure_files` table.  Each row is one tracked file;
//! the access trail and share chain live inside the row as JSON arrays, the
//! document-store shape the rest of the system expects.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Tracked files (chain-of-custody records)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS secure_files (
    id              TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    file_name       TEXT NOT NULL,
    secure_filename TEXT NOT NULL UNIQUE,
    original_path   TEXT NOT NULL,
    owner_id        TEXT NOT NULL,
    uploaded_at     TEXT NOT NULL,               -- "YYYY-MM-DD HH:MM:SS"
    encryption_key  TEXT NOT NULL,               -- lowercase hex, 32 chars
    blob_locator    TEXT NOT NULL,
    access_records  TEXT NOT NULL DEFAULT '[]',  -- JSON array of access events
    share_chain     TEXT NOT NULL DEFAULT '[]'   -- JSON array of share events
);

CREATE INDEX IF NOT EXISTS idx_secure_files_owner ON secure_files(owner_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
