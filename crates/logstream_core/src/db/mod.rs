//! SQLite connection bootstrap and log table schema.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteLogStore`.
//! - Create the per-collection log table on first use.
//!
//! # Invariants
//! - Returned connections carry the configured busy timeout.
//! - Schema creation is idempotent and never drops data.

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
