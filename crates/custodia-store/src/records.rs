use chrono::NaiveDateTime;
use rusqlite::{params, TransactionBehavior};

use custodia_shared::constants::LEDGER_TIME_FORMAT;

use crate::database::Database;
use crate::error::{LedgerError, Result};
use crate::models::{AccessEvent, RecordId, ShareEvent, TrackedFileRecord};

impl Database {
    pub fn insert_record(&self, id: &RecordId, record: &TrackedFileRecord) -> Result<()> {
        self.conn().execute(
            "INSERT INTO secure_files
                 (id, file_name, secure_filename, original_path, owner_id,
                  uploaded_at, encryption_key, blob_locator, access_records, share_chain)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id.as_str(),
                record.file_name,
                record.secure_filename,
                record.original_path,
                record.owner_id,
                record.uploaded_at.format(LEDGER_TIME_FORMAT).to_string(),
                record.encryption_key_hex,
                record.blob_locator,
                serde_json::to_string(&record.access_records)?,
                serde_json::to_string(&record.share_chain)?,
            ],
        )?;
        Ok(())
    }

    pub fn get_record(&self, id: &RecordId) -> Result<TrackedFileRecord> {
        self.conn()
            .query_row(
                "SELECT id, file_name, secure_filename, original_path, owner_id,
                        uploaded_at, encryption_key, blob_locator, access_records, share_chain
                 FROM secure_files
                 WHERE id = ?1",
                params![id.as_str()],
                row_to_record,
            )
            .map(|(_, record)| record)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LedgerError::NotFound,
                other => LedgerError::Sqlite(other),
            })
    }

    /// All records owned by `owner_id`, oldest first (insertion order).
    pub fn records_by_owner(&self, owner_id: &str) -> Result<Vec<(RecordId, TrackedFileRecord)>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, file_name, secure_filename, original_path, owner_id,
                    uploaded_at, encryption_key, blob_locator, access_records, share_chain
             FROM secure_files
             WHERE owner_id = ?1
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![owner_id], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Append one access event inside an immediate transaction, so the
    /// read-modify-write of the JSON list cannot interleave with another
    /// writer.
    pub fn append_access_event(&mut self, id: &RecordId, event: &AccessEvent) -> Result<()> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let json: String = tx
            .query_row(
                "SELECT access_records FROM secure_files WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LedgerError::NotFound,
                other => LedgerError::Sqlite(other),
            })?;

        let mut events: Vec<AccessEvent> = serde_json::from_str(&json)?;
        events.push(event.clone());

        tx.execute(
            "UPDATE secure_files SET access_records = ?1 WHERE id = ?2",
            params![serde_json::to_string(&events)?, id.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Append one share event; same transactional shape as
    /// [`append_access_event`](Self::append_access_event).
    pub fn append_share_event(&mut self, id: &RecordId, event: &ShareEvent) -> Result<()> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let json: String = tx
            .query_row(
                "SELECT share_chain FROM secure_files WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LedgerError::NotFound,
                other => LedgerError::Sqlite(other),
            })?;

        let mut events: Vec<ShareEvent> = serde_json::from_str(&json)?;
        events.push(event.clone());

        tx.execute(
            "UPDATE secure_files SET share_chain = ?1 WHERE id = ?2",
            params![serde_json::to_string(&events)?, id.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(RecordId, TrackedFileRecord)> {
    let id: String = row.get(0)?;
    let file_name: String = row.get(1)?;
    let secure_filename: String = row.get(2)?;
    let original_path: String = row.get(3)?;
    let owner_id: String = row.get(4)?;
    let uploaded_str: String = row.get(5)?;
    let encryption_key_hex: String = row.get(6)?;
    let blob_locator: String = row.get(7)?;
    let access_json: String = row.get(8)?;
    let share_json: String = row.get(9)?;

    let uploaded_at = NaiveDateTime::parse_from_str(&uploaded_str, LEDGER_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let access_records: Vec<AccessEvent> = serde_json::from_str(&access_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let share_chain: Vec<ShareEvent> = serde_json::from_str(&share_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok((
        RecordId(id),
        TrackedFileRecord {
            file_name,
            secure_filename,
            original_path,
            owner_id,
            uploaded_at,
            encryption_key_hex,
            blob_locator,
            access_records,
            share_chain,
        },
    ))
}
