use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use expertise_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS;
use expertise_core::errors::ExpertiseResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// The single connection allowed to write.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u64) -> ExpertiseResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> ExpertiseResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, DEFAULT_BUSY_TIMEOUT_MS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn_sync<F, T>(&self, f: F) -> ExpertiseResult<T>
    where
        F: FnOnce(&Connection) -> ExpertiseResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write lock poisoned: {e}")))?;
        f(&guard)
    }
}
