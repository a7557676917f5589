//! Recent-entries query service.
//!
//! # Responsibility
//! - Fetch the newest entries of the log partition with one store query.
//! - Project stored records into the reader-facing shape.
//!
//! # Invariants
//! - Never more than `RECENT_ENTRIES_LIMIT` entries per response.
//! - Projection keeps the store's order; nothing is re-sorted here.
//! - An empty partition is a success, not a failure.

use crate::logging::sanitize_message;
use crate::model::log_entry::{LogEntry, LogEntryResponse, RecentEntries};
use crate::service::ServiceResult;
use crate::store::{LogStore, PartitionQuery};
use log::{error, info};
use std::time::Instant;

/// Fixed size of the most-recent window.
pub const RECENT_ENTRIES_LIMIT: u32 = 100;

const MAX_LOGGED_ERROR_CHARS: usize = 240;

/// Read-side service for recent entries.
pub struct QueryService<S: LogStore> {
    store: S,
}

impl<S: LogStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the newest `RECENT_ENTRIES_LIMIT` entries, newest first.
    pub fn recent(&self) -> ServiceResult<RecentEntries> {
        self.recent_with_limit(RECENT_ENTRIES_LIMIT)
    }

    /// Same as `recent` with a smaller window.
    ///
    /// `max_count` above `RECENT_ENTRIES_LIMIT` is clamped down.
    pub fn recent_with_limit(&self, max_count: u32) -> ServiceResult<RecentEntries> {
        let items = self.fetch_recent(max_count)?;
        Ok(RecentEntries::new(project(&items)))
    }

    /// Issues the single newest-first store query.
    ///
    /// # Errors
    /// - `Store` when the query fails or returns an invalid record.
    pub fn fetch_recent(&self, max_count: u32) -> ServiceResult<Vec<LogEntry>> {
        let started_at = Instant::now();
        let query = PartitionQuery::latest(max_count.min(RECENT_ENTRIES_LIMIT));

        match self.store.query_items(&query) {
            Ok(items) => {
                info!(
                    "event=entry_query module=service status=ok limit={} returned={} duration_ms={}",
                    query.limit,
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(items)
            }
            Err(err) => {
                error!(
                    "event=entry_query module=service status=error limit={} duration_ms={} error_code=store_query_failed error={}",
                    query.limit,
                    started_at.elapsed().as_millis(),
                    sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                Err(err.into())
            }
        }
    }
}

/// Maps stored records to responses, preserving order.
pub fn project(items: &[LogEntry]) -> Vec<LogEntryResponse> {
    items.iter().map(LogEntry::to_response).collect()
}
