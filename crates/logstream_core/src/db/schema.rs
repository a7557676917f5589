//! Log table definition.
//!
//! One table per collection, keyed by (`PK`, `SK`). The composite primary
//! key is the store's uniqueness key: a second put with the same pair
//! replaces the first.

use crate::config::TableName;
use crate::store::StoreResult;
use rusqlite::Connection;

/// Creates the collection table when missing.
pub fn ensure_log_table(conn: &Connection, table: &TableName) -> StoreResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            PK TEXT NOT NULL,
            SK TEXT NOT NULL,
            ID TEXT NOT NULL,
            Severity TEXT NOT NULL,
            Message TEXT NOT NULL,
            DateTime TEXT NOT NULL,
            PRIMARY KEY (PK, SK)
        ) WITHOUT ROWID;"
    ))?;
    Ok(())
}

/// Returns whether the collection table exists.
pub fn log_table_exists(conn: &Connection, table: &TableName) -> StoreResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table.as_str()],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}
