use serde::{Deserialize, Serialize};

use super::{AuthorId, DocumentId, EntityId};

/// One entity mention returned by the annotation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub entity_id: EntityId,
    pub entity_title: String,
    /// Annotation confidence in [0, 1].
    pub score: f64,
    /// Character span `(start, end)` of the mention.
    pub span: (usize, usize),
}

/// A document as it arrives for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub author_id: AuthorId,
    pub year: i32,
    pub body: String,
}

/// Per-document summary of one entity: how often it was annotated and
/// the best confidence among those annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntity {
    pub entity_id: EntityId,
    pub entity_title: String,
    pub count: u32,
    pub max_score: f64,
}

/// A document ready to be written; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub author_id: AuthorId,
    pub year: i32,
    pub body: String,
    pub entities: Vec<DocumentEntity>,
}

/// A persisted, immutable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub document_id: DocumentId,
    pub author_id: AuthorId,
    pub year: i32,
    pub body: String,
    pub entities: Vec<DocumentEntity>,
}
