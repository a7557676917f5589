//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have `busy_timeout` set to the store timeout, so
//!   lock waits end as store errors instead of hanging a request.
//! - File databases run in WAL mode so reads do not block the writer.

use crate::store::StoreResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) a SQLite database file.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, timeout: Duration) -> StoreResult<Connection> {
    let path = path.as_ref();
    open_with("file", timeout, || Connection::open(path), |conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
    })
}

/// Opens a private in-memory SQLite database.
pub fn open_db_in_memory(timeout: Duration) -> StoreResult<Connection> {
    open_with("memory", timeout, Connection::open_in_memory, |_| Ok(()))
}

fn open_with(
    mode: &str,
    timeout: Duration,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
    configure: impl FnOnce(&Connection) -> rusqlite::Result<()>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match open().and_then(|conn| {
        conn.busy_timeout(timeout)?;
        configure(&conn)?;
        Ok(conn)
    }) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    info!(
        "event=db_open module=db status=ok mode={} duration_ms={}",
        mode,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}
