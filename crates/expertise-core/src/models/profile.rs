use serde::{Deserialize, Serialize};

use super::{AuthorId, EntityId};

/// Read-only view of an author's expertise, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub author_id: AuthorId,
    pub name: String,
    pub institution: String,
    pub document_count: u64,
    /// Sorted by document count, most frequent first.
    pub entities: Vec<ProfileEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntity {
    pub entity_id: EntityId,
    pub document_count: u32,
    pub max_score: f64,
    /// `(year, documents in that year)`, ascending by year.
    pub years: Vec<(i32, u32)>,
}
