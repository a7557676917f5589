//! SQLite-backed log store.
//!
//! # Responsibility
//! - Persist entries in one table per collection.
//! - Serve partition queries straight from the (`PK`, `SK`) primary key.
//!
//! # Invariants
//! - Puts are upserts on (`PK`, `SK`); same-millisecond entries overwrite.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - The connection is only touched under the mutex.

use crate::config::TableName;
use crate::db::schema::ensure_log_table;
use crate::db::{open_db, open_db_in_memory};
use crate::model::log_entry::{LogEntry, Severity};
use crate::store::{LogStore, PartitionQuery, SortOrder, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Log store over a single SQLite connection.
pub struct SqliteLogStore {
    conn: Mutex<Connection>,
    table: TableName,
}

impl SqliteLogStore {
    /// Opens the database at `path` and ensures the collection table exists.
    pub fn open(path: impl AsRef<Path>, table: TableName, timeout: Duration) -> StoreResult<Self> {
        Self::from_connection(open_db(path, timeout)?, table)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory(table: TableName, timeout: Duration) -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory(timeout)?, table)
    }

    /// Wraps an already configured connection.
    pub fn from_connection(conn: Connection, table: TableName) -> StoreResult<Self> {
        ensure_log_table(&conn, &table)?;
        Ok(Self {
            conn: Mutex::new(conn),
            table,
        })
    }

    pub fn table_name(&self) -> &TableName {
        &self.table
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl LogStore for SqliteLogStore {
    fn put_item(&self, entry: &LogEntry) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO \"{}\" (PK, SK, ID, Severity, Message, DateTime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                self.table
            ),
            params![
                entry.partition_key.as_str(),
                entry.sort_key.as_str(),
                entry.id.as_str(),
                entry.severity.as_str(),
                entry.message.as_str(),
                entry.date_time.as_str(),
            ],
        )?;
        Ok(())
    }

    fn query_items(&self, query: &PartitionQuery) -> StoreResult<Vec<LogEntry>> {
        let direction = match query.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT PK, SK, ID, Severity, Message, DateTime
             FROM \"{}\"
             WHERE PK = ?1
             ORDER BY SK {direction}
             LIMIT ?2;",
            self.table
        ))?;

        let mut rows = stmt.query(params![query.partition_key.as_str(), i64::from(query.limit)])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<LogEntry> {
    let severity_text: String = row.get("Severity")?;
    let severity = Severity::parse(&severity_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid severity `{severity_text}` in Severity"))
    })?;

    Ok(LogEntry {
        partition_key: row.get("PK")?,
        sort_key: row.get("SK")?,
        id: row.get("ID")?,
        severity,
        message: row.get("Message")?,
        date_time: row.get("DateTime")?,
    })
}

#[cfg(test)]
mod tests {
    use super::SqliteLogStore;
    use crate::config::TableName;
    use crate::model::input::NewLogEntry;
    use crate::model::log_entry::{LogEntry, Severity};
    use crate::store::{LogStore, PartitionQuery, SortOrder, StoreError};
    use chrono::{Duration, TimeZone, Utc};
    use std::time::Duration as StdDuration;

    fn store() -> SqliteLogStore {
        SqliteLogStore::open_in_memory(
            TableName::parse("log_entries").unwrap(),
            StdDuration::from_secs(1),
        )
        .unwrap()
    }

    fn entry_at(id: &str, offset_ms: i64) -> LogEntry {
        let base = Utc.with_ymd_and_hms(2025, 11, 11, 14, 42, 0).unwrap();
        let input = NewLogEntry::new(Severity::Info, format!("message {id}")).unwrap();
        LogEntry::with_id(id, input, base + Duration::milliseconds(offset_ms))
    }

    #[test]
    fn query_returns_newest_first_with_limit() {
        let store = store();
        for (id, offset) in [("a", 0), ("c", 2_000), ("b", 1_000)] {
            store.put_item(&entry_at(id, offset)).unwrap();
        }

        let latest = store.query_items(&PartitionQuery::latest(2)).unwrap();
        let ids: Vec<&str> = latest.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        let oldest_first = PartitionQuery {
            order: SortOrder::Ascending,
            ..PartitionQuery::latest(10)
        };
        let all = store.query_items(&oldest_first).unwrap();
        let ids: Vec<&str> = all.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn same_sort_key_overwrites_previous_item() {
        let store = store();
        store.put_item(&entry_at("first", 5)).unwrap();
        store.put_item(&entry_at("second", 5)).unwrap();

        let items = store.query_items(&PartitionQuery::latest(10)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "second");
    }

    #[test]
    fn other_partitions_are_not_returned() {
        let store = store();
        let mut foreign = entry_at("foreign", 10);
        foreign.partition_key = "AUDIT".to_string();
        store.put_item(&foreign).unwrap();
        store.put_item(&entry_at("local", 0)).unwrap();

        let items = store.query_items(&PartitionQuery::latest(10)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "local");
    }

    #[test]
    fn invalid_persisted_severity_is_rejected() {
        let store = store();
        store.put_item(&entry_at("ok", 0)).unwrap();
        store
            .lock()
            .unwrap()
            .execute("UPDATE \"log_entries\" SET Severity = 'debug';", [])
            .unwrap();

        let err = store.query_items(&PartitionQuery::latest(10)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn stored_fields_survive_a_round_trip() {
        let store = store();
        let entry = entry_at("id-1", 135);
        store.put_item(&entry).unwrap();

        let items = store.query_items(&PartitionQuery::latest(1)).unwrap();
        assert_eq!(items, vec![entry]);
    }
}
