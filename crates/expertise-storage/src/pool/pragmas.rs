//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use expertise_core::errors::ExpertiseResult;

use crate::to_storage_err;

/// WAL journal, NORMAL sync, foreign keys and the configured busy timeout.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> ExpertiseResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Readers never change the journal mode.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u64) -> ExpertiseResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA query_only = ON;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn verify_wal_mode(conn: &Connection) -> ExpertiseResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
