//! Versioned schema migrations tracked through `PRAGMA user_version`.

mod v001_statistics;
mod v002_full_text;

use rusqlite::Connection;
use tracing::info;

use expertise_core::errors::{ExpertiseResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> ExpertiseResult<()>;

const MIGRATIONS: [(u32, Migration); 2] = [
    (1, v001_statistics::migrate),
    (2, v002_full_text::migrate),
];

pub const LATEST_VERSION: u32 = MIGRATIONS.len() as u32;

pub fn current_version(conn: &Connection) -> ExpertiseResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database, each in its own transaction.
pub fn run_migrations(conn: &Connection) -> ExpertiseResult<u32> {
    let mut version = current_version(conn)?;
    for (target, migrate) in MIGRATIONS {
        if target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration begin: {e}")))?;
        let applied = migrate(&tx).and_then(|()| {
            tx.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))
        });
        match applied {
            Ok(()) => tx.commit().map_err(|e| StorageError::MigrationFailed {
                version: target,
                reason: e.to_string(),
            })?,
            Err(e) => {
                let _ = tx.rollback();
                return Err(StorageError::MigrationFailed {
                    version: target,
                    reason: e.to_string(),
                }
                .into());
            }
        }
        info!(version = target, "applied schema migration");
        version = target;
    }
    Ok(version)
}
