//! # expertise-ingest
//!
//! Turns annotated documents into per-author and per-entity statistics.
//! [`Aggregator`] ingests one document; [`CorpusBuilder`] drives a whole corpus
//! through annotation and aggregation.

pub mod aggregator;
pub mod builder;
pub mod locks;
pub mod reader;

pub use aggregator::{summarize_annotations, Aggregator, IngestOutcome, SkipReason};
pub use builder::{BuildReport, CorpusBuilder};
pub use locks::KeyLocks;
pub use reader::{read_papers_jsonl, Paper};
