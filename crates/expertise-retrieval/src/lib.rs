//! # expertise-retrieval
//!
//! The query side: extract query entities, gather entity and term
//! candidates, score them with every signal of a plan, and fuse the
//! signals into one ranking.
//!
//! Stages run in a fixed order (entity extraction, candidate retrieval,
//! scoring, normalize/merge). A failing signal degrades to an empty
//! ranking instead of failing the query.

pub mod candidates;
pub mod finder;
pub mod pool;
pub mod profile;
pub mod query_entities;
pub mod stages;

pub use expertise_scoring::fusion;

pub use candidates::{group_term_hits, EntityCandidateRetriever, TermCandidateRetriever};
pub use finder::{ExpertFinder, ExpertSearchResult, SignalResult};
pub use pool::QueryPool;
pub use query_entities::extract_query_entities;
pub use stages::{QueryStage, StageTimings};
