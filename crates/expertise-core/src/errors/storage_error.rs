/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("corrupt record {key}: {details}")]
    CorruptRecord { key: String, details: String },

    #[error("lock poisoned: {details}")]
    LockPoisoned { details: String },

    #[error("I/O error on {path}: {details}")]
    Io { path: String, details: String },
}
