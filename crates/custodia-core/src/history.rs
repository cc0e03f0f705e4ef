//! History flattening.
//!
//! A record stores its share chain and access trail separately; the activity
//! feed merges both, across all of an owner's records, into one flat
//! newest-first list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use custodia_store::{AccessAction, RecordId, TrackedFileRecord};

/// One line of an owner's activity feed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub file_name: String,
    /// Who acted: the accessing user's id, or `"Shared with: <recipient>"`
    /// for share links.
    pub actor: String,
    pub location: String,
    /// Share entries carry the granted access level; access entries carry
    /// nothing extra.
    pub detail: Option<String>,
    #[serde(with = "custodia_shared::time::ledger_format")]
    pub time: DateTime<Utc>,
    pub record_id: RecordId,
    pub kind: AccessAction,
}

/// Flatten owner records into display entries, newest first.
///
/// Per record, share links come before access entries and records keep their
/// query order; the sort is stable, so events stamped within the same second
/// keep exactly that insertion order.
pub fn flatten_history(records: Vec<(RecordId, TrackedFileRecord)>) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();

    for (record_id, record) in records {
        for share in &record.share_chain {
            entries.push(HistoryEntry {
                file_name: record.file_name.clone(),
                actor: format!("Shared with: {}", share.shared_with),
                location: share.location.clone(),
                detail: Some(share.access_level.to_string()),
                time: share.time,
                record_id: record_id.clone(),
                kind: AccessAction::Share,
            });
        }
        for access in &record.access_records {
            entries.push(HistoryEntry {
                file_name: record.file_name.clone(),
                actor: access.user_id.clone(),
                location: access.location.clone(),
                detail: None,
                time: access.time,
                record_id: record_id.clone(),
                kind: access.action,
            });
        }
    }

    entries.sort_by(|a, b| b.time.cmp(&a.time));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use custodia_store::{AccessEvent, AccessLevel, ShareEvent};

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, min, sec).unwrap()
    }

    fn record(file_name: &str) -> TrackedFileRecord {
        TrackedFileRecord {
            file_name: file_name.to_string(),
            secure_filename: format!("20240601_090000_AAAAAAAAAAA_{file_name}"),
            original_path: format!("/home/alice/{file_name}"),
            owner_id: "alice".to_string(),
            uploaded_at: at(9, 0, 0),
            encryption_key_hex: "00112233445566778899aabbccddeeff".to_string(),
            blob_locator: "file:///tmp/blob".to_string(),
            access_records: vec![],
            share_chain: vec![],
        }
    }

    fn share(to: &str, time: DateTime<Utc>) -> ShareEvent {
        ShareEvent {
            user_id: "alice".to_string(),
            shared_with: to.to_string(),
            access_level: AccessLevel::ViewOnly,
            time,
            location: "Paris, France".to_string(),
        }
    }

    fn view(by: &str, time: DateTime<Utc>) -> AccessEvent {
        AccessEvent {
            user_id: by.to_string(),
            action: AccessAction::View,
            location: "Unknown".to_string(),
            time,
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let mut r = record("report.pdf");
        r.share_chain = vec![share("bob", at(9, 0, 0))];
        r.access_records = vec![view("bob", at(11, 30, 0)), view("carol", at(10, 15, 0))];

        let entries = flatten_history(vec![(RecordId("r1".into()), r)]);

        let times: Vec<DateTime<Utc>> = entries.iter().map(|e| e.time).collect();
        assert_eq!(times, [at(11, 30, 0), at(10, 15, 0), at(9, 0, 0)]);
        assert_eq!(entries[2].actor, "Shared with: bob");
        assert_eq!(entries[2].detail.as_deref(), Some("View Only"));
        assert_eq!(entries[0].detail, None);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let t = at(12, 0, 0);

        let mut first = record("a.pdf");
        first.share_chain = vec![share("bob", t)];
        first.access_records = vec![view("alice", t)];

        let mut second = record("b.pdf");
        second.share_chain = vec![share("carol", t)];

        let entries = flatten_history(vec![
            (RecordId("r1".into()), first),
            (RecordId("r2".into()), second),
        ]);

        // Stable sort: shares before accesses within a record, records in
        // query order.
        let actors: Vec<&str> = entries.iter().map(|e| e.actor.as_str()).collect();
        assert_eq!(actors, ["Shared with: bob", "alice", "Shared with: carol"]);
    }

    #[test]
    fn test_empty_records_flatten_to_nothing() {
        assert!(flatten_history(vec![]).is_empty());
        assert!(flatten_history(vec![(RecordId("r1".into()), record("a.pdf"))]).is_empty());
    }

    #[test]
    fn test_share_kind_is_share() {
        let mut r = record("report.pdf");
        r.share_chain = vec![share("bob", at(9, 0, 0))];

        let entries = flatten_history(vec![(RecordId("r1".into()), r)]);
        assert_eq!(entries[0].kind, AccessAction::Share);
    }
}
