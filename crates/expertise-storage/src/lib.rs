//! # expertise-storage
//!
//! SQLite-backed statistics store: authors with their entity statistics,
//! entity popularity records, immutable documents, the entity → author
//! inverted index and an FTS5 index over document bodies.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use expertise_core::errors::{ExpertiseError, StorageError};

/// Wrap a SQLite failure message into the workspace error.
pub(crate) fn to_storage_err(message: String) -> ExpertiseError {
    ExpertiseError::StorageError(StorageError::SqliteError { message })
}
