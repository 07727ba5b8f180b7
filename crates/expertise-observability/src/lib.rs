//! # expertise-observability
//!
//! Structured logging setup, span macros for the query and ingestion paths,
//! and a bounded query performance log.

pub mod query_log;
pub mod tracing_setup;

pub use query_log::{QueryLog, QueryLogEntry};
pub use tracing_setup::{init_from_config, init_tracing};
