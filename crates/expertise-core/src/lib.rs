//! # expertise-core
//!
//! Foundation crate for the expertise ranking engine.
//! Defines the data model, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelToken;
pub use config::ExpertiseConfig;
pub use errors::{ExpertiseError, ExpertiseResult};
pub use models::{
    Annotation, Author, AuthorEntityStat, AuthorId, AuthorInfo, DocumentId, EntityId,
    EntityPopularity, PopularityMeasure, RankedAuthor, ScoringKind, ScoringPlan,
};
