//! Data model shared by ingestion, storage, scoring and retrieval.

mod author;
mod degradation_event;
mod document;
mod popularity;
mod profile;
mod ranking;
mod scoring;

pub use author::{Author, AuthorEntityStat, AuthorInfo};
pub use degradation_event::DegradationEvent;
pub use document::{Annotation, DocumentEntity, DocumentInput, NewDocument, StoredDocument};
pub use popularity::{AuthorOccurrence, EntityPopularity, PopularityMeasure};
pub use profile::{AuthorProfile, ProfileEntity};
pub use ranking::{sort_ranked, QueryEntity, RankedAuthor, TermAuthorHits, TermHit};
pub use scoring::{FusionStrategy, ScoringKind, ScoringPlan, SignalFamily, SignalSpec};

/// Unique author key, as provided by the corpus.
pub type AuthorId = String;

/// Disambiguated entity key, as returned by the annotation service.
pub type EntityId = String;

/// Store-assigned, monotonically increasing document key.
pub type DocumentId = i64;
