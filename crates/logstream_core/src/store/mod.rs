//! Store client contract and implementations.
//!
//! # Responsibility
//! - Define the two operations the services need from a key-value store:
//!   put one item by key, query one partition ordered by sort key.
//! - Keep SQL and in-memory details behind `LogStore`.
//!
//! # Invariants
//! - (`partition_key`, `sort_key`) is unique; a put on an existing pair
//!   replaces the stored item.
//! - Query results come back in the requested sort-key order, at most
//!   `limit` items.
//! - Implementations are `Send + Sync` and hold no application state.

pub mod memory_store;
pub mod sqlite_store;

use crate::model::log_entry::{LogEntry, LOG_PARTITION_KEY};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store connection lock poisoned")]
    LockPoisoned,
    #[error("invalid stored log entry: {0}")]
    InvalidData(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Single-partition query, ordered by sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionQuery {
    pub partition_key: String,
    pub order: SortOrder,
    pub limit: u32,
}

impl PartitionQuery {
    /// Newest-first query over the log partition.
    pub fn latest(limit: u32) -> Self {
        Self {
            partition_key: LOG_PARTITION_KEY.to_string(),
            order: SortOrder::Descending,
            limit,
        }
    }
}

/// Backing key-value store used by the ingest and query services.
pub trait LogStore: Send + Sync {
    /// Writes `entry` under (`partition_key`, `sort_key`).
    fn put_item(&self, entry: &LogEntry) -> StoreResult<()>;

    /// Returns up to `query.limit` items of one partition in sort-key order.
    fn query_items(&self, query: &PartitionQuery) -> StoreResult<Vec<LogEntry>>;
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn put_item(&self, entry: &LogEntry) -> StoreResult<()> {
        (**self).put_item(entry)
    }

    fn query_items(&self, query: &PartitionQuery) -> StoreResult<Vec<LogEntry>> {
        (**self).query_items(query)
    }
}

impl<S: LogStore + ?Sized> LogStore for Arc<S> {
    fn put_item(&self, entry: &LogEntry) -> StoreResult<()> {
        (**self).put_item(entry)
    }

    fn query_items(&self, query: &PartitionQuery) -> StoreResult<Vec<LogEntry>> {
        (**self).query_items(query)
    }
}
