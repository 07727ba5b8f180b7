use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AuthorId, DocumentId, EntityId};

/// One entry of a ranked author list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAuthor {
    pub author_id: AuthorId,
    pub name: String,
    pub score: f64,
}

impl RankedAuthor {
    pub fn new(author_id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        Self {
            author_id: author_id.into(),
            name: name.into(),
            score,
        }
    }
}

/// Sort by score descending; equal scores fall back to author id ascending
/// so every ranking is deterministic.
pub fn sort_ranked(ranking: &mut [RankedAuthor]) {
    ranking.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.author_id.cmp(&b.author_id))
    });
}

/// An entity recognized in the query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntity {
    pub entity_id: EntityId,
    pub entity_title: String,
    pub score: f64,
}

/// One full-text hit: a document and its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermHit {
    pub document_id: DocumentId,
    pub author_id: AuthorId,
    pub author_name: String,
    pub year: i32,
    pub score: f64,
}

/// Full-text hits grouped under their author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermAuthorHits {
    pub author_id: AuthorId,
    pub name: String,
    /// Document id to publication year.
    pub documents: BTreeMap<DocumentId, i32>,
    /// Document id to relevance score.
    pub scores: BTreeMap<DocumentId, f64>,
}

impl TermAuthorHits {
    pub fn new(author_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            name: name.into(),
            documents: BTreeMap::new(),
            scores: BTreeMap::new(),
        }
    }
}
