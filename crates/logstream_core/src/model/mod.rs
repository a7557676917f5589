//! Log entry domain model.
//!
//! # Responsibility
//! - Define the canonical stored record and its client-facing projection.
//! - Turn untrusted ingest payloads into typed, validated input.
//!
//! # Invariants
//! - Every stored entry lives in the single `LOG` partition.
//! - `sort_key` and `date_time` carry the same millisecond UTC timestamp.
//! - Entries are immutable once written.

pub mod input;
pub mod log_entry;
