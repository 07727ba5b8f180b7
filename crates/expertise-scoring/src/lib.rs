//! # expertise-scoring
//!
//! Pure scoring over aggregated statistics: IAF query weights, the closed
//! set of author scoring functions selected by [`ScoringKind`], and the
//! normalize/merge primitives that fuse per-signal rankings.
//!
//! Nothing here performs I/O. Callers gather popularity counts and
//! relatedness values up front and pass them in a [`ScoringContext`].

pub mod context;
pub mod entity;
pub mod fusion;
pub mod iaf;
pub mod registry;
pub mod relatedness;
pub mod term;

pub use context::{RelatednessTable, ScoringContext};
pub use expertise_core::models::ScoringKind;
pub use iaf::{inverse_frequency, query_weights};
pub use registry::{relatedness_pairs, score_author, score_authors, score_term_authors};
