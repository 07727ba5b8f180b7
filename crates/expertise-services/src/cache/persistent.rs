//! SQLite tier shared by both caches. Survives process restarts.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use expertise_core::errors::{ExpertiseError, ExpertiseResult, StorageError};
use expertise_core::models::Annotation;

fn cache_err(e: impl std::fmt::Display) -> ExpertiseError {
    StorageError::SqliteError {
        message: format!("service cache: {e}"),
    }
    .into()
}

pub struct PersistentTier {
    conn: Mutex<Connection>,
}

impl PersistentTier {
    pub fn open(path: &Path) -> ExpertiseResult<Self> {
        let conn = Connection::open(path).map_err(cache_err)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .map_err(cache_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> ExpertiseResult<Self> {
        Self::init(Connection::open_in_memory().map_err(cache_err)?)
    }

    fn init(conn: Connection) -> ExpertiseResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS annotation_cache (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS relatedness_cache (
                a     TEXT NOT NULL,
                b     TEXT NOT NULL,
                value REAL NOT NULL,
                PRIMARY KEY (a, b)
            );
            ",
        )
        .map_err(cache_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> ExpertiseResult<T>
    where
        F: FnOnce(&Connection) -> ExpertiseResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| StorageError::LockPoisoned {
            details: format!("service cache: {e}"),
        })?;
        f(&guard)
    }

    pub fn get_annotations(&self, key: &str) -> ExpertiseResult<Option<Vec<Annotation>>> {
        self.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT value FROM annotation_cache WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(cache_err)?;
            raw.map(|raw| serde_json::from_str(&raw).map_err(ExpertiseError::from))
                .transpose()
        })
    }

    pub fn put_annotations(
        &self,
        entries: &[(String, Arc<Vec<Annotation>>)],
    ) -> ExpertiseResult<usize> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(cache_err)?;
            {
                let mut stmt = tx
                    .prepare_cached("INSERT OR REPLACE INTO annotation_cache (key, value) VALUES (?1, ?2)")
                    .map_err(cache_err)?;
                for (key, annotations) in entries {
                    let value = serde_json::to_string(annotations.as_ref())?;
                    stmt.execute(params![key, value]).map_err(cache_err)?;
                }
            }
            tx.commit().map_err(cache_err)?;
            Ok(entries.len())
        })
    }

    pub fn get_relatedness(&self, a: &str, b: &str) -> ExpertiseResult<Option<f64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM relatedness_cache WHERE a = ?1 AND b = ?2",
                params![a, b],
                |row| row.get(0),
            )
            .optional()
            .map_err(cache_err)
        })
    }

    pub fn put_relatedness(&self, entries: &[((String, String), f64)]) -> ExpertiseResult<usize> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(cache_err)?;
            {
                let mut stmt = tx
                    .prepare_cached("INSERT OR REPLACE INTO relatedness_cache (a, b, value) VALUES (?1, ?2, ?3)")
                    .map_err(cache_err)?;
                for ((a, b), value) in entries {
                    stmt.execute(params![a, b, value]).map_err(cache_err)?;
                }
            }
            tx.commit().map_err(cache_err)?;
            Ok(entries.len())
        })
    }
}
