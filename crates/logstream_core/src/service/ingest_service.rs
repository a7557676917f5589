//! Ingest use-case service.
//!
//! # Responsibility
//! - Validate a raw payload, stamp it with identity and time, write it.
//!
//! # Invariants
//! - Rejected payloads never reach the store.
//! - Exactly one `put_item` per accepted payload; failures are surfaced,
//!   not retried.

use crate::clock::{Clock, SystemClock};
use crate::logging::sanitize_message;
use crate::model::input::{parse_ingest_body, NewLogEntry};
use crate::model::log_entry::LogEntry;
use crate::service::{ServiceError, ServiceResult};
use crate::store::LogStore;
use log::{error, info, warn};
use std::time::Instant;

const MAX_LOGGED_ERROR_CHARS: usize = 240;

/// Write-side service for new log entries.
pub struct IngestService<S: LogStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: LogStore> IngestService<S> {
    /// Creates a service stamping entries with wall-clock time.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: LogStore, C: Clock> IngestService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Validates `body` and stores the resulting entry.
    ///
    /// Returns the stored entry; callers expose only its `id`.
    ///
    /// # Errors
    /// - `Validation` for absent, unparseable or out-of-range payloads.
    /// - `Store` when the write fails.
    pub fn ingest(&self, body: Option<&str>) -> ServiceResult<LogEntry> {
        let input = parse_ingest_body(body).map_err(|err| {
            warn!("event=entry_ingest module=service status=rejected reason={err}");
            ServiceError::from(err)
        })?;
        self.create_entry(input)
    }

    /// Builds an entry from validated input at the current clock time and
    /// writes it.
    pub fn create_entry(&self, input: NewLogEntry) -> ServiceResult<LogEntry> {
        let entry = LogEntry::new(input, self.clock.now());
        self.write(&entry)?;
        Ok(entry)
    }

    /// Writes one entry through the store.
    pub fn write(&self, entry: &LogEntry) -> ServiceResult<()> {
        let started_at = Instant::now();
        match self.store.put_item(entry) {
            Ok(()) => {
                info!(
                    "event=entry_ingest module=service status=ok id={} severity={} duration_ms={}",
                    entry.id,
                    entry.severity,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=entry_ingest module=service status=error id={} duration_ms={} error_code=store_put_failed error={}",
                    entry.id,
                    started_at.elapsed().as_millis(),
                    sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                Err(err.into())
            }
        }
    }
}
