//! In-process log store with the same key semantics as the SQLite store.

use crate::model::log_entry::LogEntry;
use crate::store::{LogStore, PartitionQuery, SortOrder, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::RwLock;

type ItemKey = (String, String);

/// `BTreeMap` keyed by (`partition_key`, `sort_key`).
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    items: RwLock<BTreeMap<ItemKey, LogEntry>>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items across all partitions.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogStore for InMemoryLogStore {
    fn put_item(&self, entry: &LogEntry) -> StoreResult<()> {
        let mut items = self.items.write().map_err(|_| StoreError::LockPoisoned)?;
        items.insert(
            (entry.partition_key.clone(), entry.sort_key.clone()),
            entry.clone(),
        );
        Ok(())
    }

    fn query_items(&self, query: &PartitionQuery) -> StoreResult<Vec<LogEntry>> {
        let items = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        let partition = items
            .iter()
            .filter(|((partition_key, _), _)| partition_key.as_str() == query.partition_key)
            .map(|(_, entry)| entry);

        let limit = query.limit as usize;
        let selected: Vec<LogEntry> = match query.order {
            SortOrder::Ascending => partition.take(limit).cloned().collect(),
            SortOrder::Descending => partition.rev().take(limit).cloned().collect(),
        };
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryLogStore;
    use crate::model::input::NewLogEntry;
    use crate::model::log_entry::{LogEntry, Severity};
    use crate::store::{LogStore, PartitionQuery};
    use chrono::{Duration, TimeZone, Utc};

    fn entry_at(id: &str, offset_ms: i64) -> LogEntry {
        let base = Utc.with_ymd_and_hms(2025, 11, 11, 14, 42, 0).unwrap();
        let input = NewLogEntry::new(Severity::Error, "payment failed").unwrap();
        LogEntry::with_id(id, input, base + Duration::milliseconds(offset_ms))
    }

    #[test]
    fn latest_query_is_descending_and_limited() {
        let store = InMemoryLogStore::new();
        for (id, offset) in [("old", 0), ("new", 20), ("mid", 10)] {
            store.put_item(&entry_at(id, offset)).unwrap();
        }

        let items = store.query_items(&PartitionQuery::latest(2)).unwrap();
        let ids: Vec<&str> = items.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[test]
    fn colliding_keys_keep_last_write() {
        let store = InMemoryLogStore::new();
        store.put_item(&entry_at("first", 1)).unwrap();
        store.put_item(&entry_at("second", 1)).unwrap();

        assert_eq!(store.len(), 1);
        let items = store.query_items(&PartitionQuery::latest(10)).unwrap();
        assert_eq!(items[0].id, "second");
    }

    #[test]
    fn partitions_are_isolated() {
        let store = InMemoryLogStore::new();
        let mut other = entry_at("other", 5);
        other.partition_key = "LOH".to_string();
        store.put_item(&other).unwrap();
        store.put_item(&entry_at("mine", 0)).unwrap();

        let items = store.query_items(&PartitionQuery::latest(10)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "mine");
        assert!(store
            .query_items(&PartitionQuery::latest(0))
            .unwrap()
            .is_empty());
    }
}
