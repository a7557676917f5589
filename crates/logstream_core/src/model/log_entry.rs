//! Stored log entry record and read-side projection.
//!
//! # Responsibility
//! - Build the canonical record written by the ingest path.
//! - Project stored records into the shape returned to readers.
//!
//! # Invariants
//! - `id` is a freshly generated UUID v4 and never reused.
//! - `sort_key` orders lexicographically the same way creation time does.
//! - Partition and sort keys never appear in `LogEntryResponse`.

use crate::model::input::NewLogEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Partition holding every entry; the service exposes one logical stream.
pub const LOG_PARTITION_KEY: &str = "LOG";

/// Recognized entry severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// Parses the exact lowercase wire label. No trimming or case folding.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical stored record.
///
/// Serialized with the store's attribute names (`PK`, `SK`, `ID`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "PK")]
    pub partition_key: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    #[serde(rename = "SK")]
    pub sort_key: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Severity")]
    pub severity: Severity,
    #[serde(rename = "Message")]
    pub message: String,
    /// Same value as `sort_key`, kept for the read projection.
    #[serde(rename = "DateTime")]
    pub date_time: String,
}

impl LogEntry {
    /// Builds a new entry stamped at `now` with a generated UUID v4.
    pub fn new(input: NewLogEntry, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), input, now)
    }

    /// Builds an entry with a caller-provided identifier.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(id: impl Into<String>, input: NewLogEntry, now: DateTime<Utc>) -> Self {
        let timestamp = format_sort_key(now);
        let (severity, message) = input.into_parts();
        Self {
            partition_key: LOG_PARTITION_KEY.to_string(),
            sort_key: timestamp.clone(),
            id: id.into(),
            severity,
            message,
            date_time: timestamp,
        }
    }

    pub fn to_response(&self) -> LogEntryResponse {
        LogEntryResponse {
            id: self.id.clone(),
            date_time: self.date_time.clone(),
            severity: self.severity,
            message: self.message.clone(),
        }
    }
}

/// Formats `now` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Fixed width within years 0000-9999, so string order equals time order.
pub fn format_sort_key(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Client-facing projection of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryResponse {
    pub id: String,
    pub date_time: String,
    pub severity: Severity,
    pub message: String,
}

/// Read-side envelope: newest-first entries plus their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntries {
    pub logs: Vec<LogEntryResponse>,
    /// Always equals `logs.len()`.
    pub count: usize,
}

impl RecentEntries {
    pub fn new(logs: Vec<LogEntryResponse>) -> Self {
        let count = logs.len();
        Self { logs, count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{format_sort_key, LogEntry, Severity, LOG_PARTITION_KEY};
    use crate::model::input::NewLogEntry;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_input() -> NewLogEntry {
        NewLogEntry::new(Severity::Warning, "disk almost full").unwrap()
    }

    #[test]
    fn sort_key_has_millisecond_precision_and_utc_suffix() {
        let now = Utc.with_ymd_and_hms(2025, 11, 11, 14, 43, 8).unwrap()
            + Duration::milliseconds(135);
        assert_eq!(format_sort_key(now), "2025-11-11T14:43:08.135Z");

        let whole_second = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_sort_key(whole_second), "2025-01-02T03:04:05.000Z");
    }

    #[test]
    fn sort_keys_order_like_timestamps() {
        let base = Utc.with_ymd_and_hms(2025, 11, 11, 9, 59, 59).unwrap();
        let keys: Vec<String> = [0, 1, 999, 1_000, 60_000, 86_400_000]
            .into_iter()
            .map(|ms| format_sort_key(base + Duration::milliseconds(ms)))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn new_entry_fills_keys_and_generates_uuid() {
        let now = Utc.with_ymd_and_hms(2025, 11, 11, 14, 42, 24).unwrap();
        let entry = LogEntry::new(sample_input(), now);

        assert_eq!(entry.partition_key, LOG_PARTITION_KEY);
        assert_eq!(entry.sort_key, "2025-11-11T14:42:24.000Z");
        assert_eq!(entry.date_time, entry.sort_key);
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.message, "disk almost full");
        assert_eq!(entry.id.len(), 36);
        assert!(uuid::Uuid::parse_str(&entry.id).is_ok());
    }

    #[test]
    fn ids_are_not_reused_for_the_same_instant() {
        let now = Utc::now();
        let first = LogEntry::new(sample_input(), now);
        let second = LogEntry::new(sample_input(), now);
        assert_ne!(first.id, second.id);
        assert_eq!(first.sort_key, second.sort_key);
    }

    #[test]
    fn stored_record_uses_store_attribute_names() {
        let now = Utc.with_ymd_and_hms(2025, 11, 11, 14, 42, 57).unwrap();
        let entry = LogEntry::with_id("id-2", sample_input(), now);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["PK"], "LOG");
        assert_eq!(json["SK"], "2025-11-11T14:42:57.000Z");
        assert_eq!(json["ID"], "id-2");
        assert_eq!(json["Severity"], "warning");
        assert_eq!(json["Message"], "disk almost full");
        assert_eq!(json["DateTime"], "2025-11-11T14:42:57.000Z");
    }

    #[test]
    fn response_projection_hides_keys() {
        let now = Utc.with_ymd_and_hms(2025, 11, 11, 14, 42, 57).unwrap();
        let entry = LogEntry::with_id("id-2", sample_input(), now);
        let json = serde_json::to_value(entry.to_response()).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["dateTime", "id", "message", "severity"]);
    }

    #[test]
    fn severity_parse_is_exact() {
        for severity in Severity::ALL {
            assert_eq!(Severity::parse(severity.as_str()), Some(severity));
        }
        assert_eq!(Severity::parse("INFO"), None);
        assert_eq!(Severity::parse(" info"), None);
        assert_eq!(Severity::parse("debug"), None);
    }
}
