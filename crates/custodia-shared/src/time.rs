//! Ledger timestamp handling.
//!
//! The ledger stores timestamps as `"%Y-%m-%d %H:%M:%S"` strings, so all
//! event times are truncated to whole seconds at construction. A timestamp
//! that survives a serialize/deserialize round trip compares equal to the
//! original.

use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC time truncated to the ledger format's one-second resolution.
pub fn ledger_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Serde adapter for `DateTime<Utc>` fields stored in the ledger format.
pub mod ledger_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::constants::LEDGER_TIME_FORMAT;

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(LEDGER_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, LEDGER_TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "ledger_format")]
        time: DateTime<Utc>,
    }

    #[test]
    fn test_format_roundtrip() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 41).unwrap();
        let json = serde_json::to_string(&Stamped { time }).unwrap();

        assert_eq!(json, r#"{"time":"2024-03-09 17:05:41"}"#);

        let parsed: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.time, time);
    }

    #[test]
    fn test_ledger_now_is_whole_seconds() {
        let now = ledger_now();
        assert_eq!(now.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"time":"03/09/2024"}"#);
        assert!(result.is_err());
    }
}
