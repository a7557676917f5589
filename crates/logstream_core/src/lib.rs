//! Core domain logic for logstream.
//! This crate owns entry validation, the stored record shape, the store
//! contract and the ingest/query use-cases.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ServiceConfig, TableName};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::input::{parse_ingest_body, validate_payload, NewLogEntry, ValidationError};
pub use model::log_entry::{
    format_sort_key, LogEntry, LogEntryResponse, RecentEntries, Severity, LOG_PARTITION_KEY,
};
pub use service::ingest_service::IngestService;
pub use service::query_service::{project, QueryService, RECENT_ENTRIES_LIMIT};
pub use service::{ServiceError, ServiceResult, INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE};
pub use store::memory_store::InMemoryLogStore;
pub use store::sqlite_store::SqliteLogStore;
pub use store::{LogStore, PartitionQuery, SortOrder, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
