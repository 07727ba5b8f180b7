//! SQL operations, grouped by record type. Every function takes a plain
//! connection so it runs the same inside or outside a transaction.

pub mod aggregate_ops;
pub mod author_ops;
pub mod document_ops;
pub mod entity_ops;
pub mod term_search;

use serde::de::DeserializeOwned;
use serde::Serialize;

use expertise_core::errors::{ExpertiseResult, StorageError};

/// `?{start}, ?{start + 1}, ...` for `count` parameters.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> ExpertiseResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn from_json<T: DeserializeOwned>(raw: &str, key: &str) -> ExpertiseResult<T> {
    serde_json::from_str(raw).map_err(|e| {
        StorageError::CorruptRecord {
            key: key.to_string(),
            details: e.to_string(),
        }
        .into()
    })
}
