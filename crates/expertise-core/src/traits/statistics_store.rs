use std::collections::HashMap;

use crate::errors::ExpertiseResult;
use crate::models::{
    Author, AuthorId, AuthorInfo, DocumentId, EntityId, EntityPopularity, NewDocument,
    PopularityMeasure, StoredDocument,
};

/// Persistence of author statistics, entity popularity and documents.
///
/// Writes are not synchronized here: callers performing read-modify-write
/// on one author or entity must hold that key's lock.
pub trait IStatisticsStore: Send + Sync {
    // --- Authors ---
    fn get_author(&self, author_id: &str) -> ExpertiseResult<Option<Author>>;
    /// Missing ids are silently left out.
    fn get_authors(&self, author_ids: &[AuthorId]) -> ExpertiseResult<Vec<Author>>;
    fn upsert_author(&self, author: &Author) -> ExpertiseResult<()>;

    // --- Entities ---
    fn get_entity(&self, entity_id: &str) -> ExpertiseResult<Option<EntityPopularity>>;
    fn upsert_entity(&self, entity: &EntityPopularity) -> ExpertiseResult<()>;

    /// Insert `document` and write its author and the entity records it
    /// touches in one transaction, returning the new document id.
    ///
    /// The id is appended to `author.document_ids` and to each entity's
    /// `documents` before they are written. Nothing is kept on failure.
    fn save_document_aggregates(
        &self,
        document: &NewDocument,
        author: &Author,
        entities: &[EntityPopularity],
    ) -> ExpertiseResult<DocumentId>;

    // --- Documents ---
    /// Store a document and return its newly assigned id.
    fn insert_document(&self, document: &NewDocument) -> ExpertiseResult<DocumentId>;
    fn get_document(&self, document_id: DocumentId) -> ExpertiseResult<Option<StoredDocument>>;
    /// The author's documents mentioning any of `entity_ids`; all of them if `entity_ids` is empty.
    fn author_documents_with_entities(
        &self,
        author_id: &str,
        entity_ids: &[EntityId],
    ) -> ExpertiseResult<Vec<StoredDocument>>;

    // --- Query support ---
    /// Popularity of each known entity. Unknown entities are absent from the map.
    fn entity_popularity(
        &self,
        entity_ids: &[EntityId],
        measure: PopularityMeasure,
    ) -> ExpertiseResult<HashMap<EntityId, u64>>;
    /// Distinct authors with at least one of `entity_ids` at `max_score >= min_score`,
    /// sorted by id.
    fn citing_authors(
        &self,
        entity_ids: &[EntityId],
        min_score: f64,
    ) -> ExpertiseResult<Vec<AuthorId>>;
    fn search_authors_by_name(
        &self,
        fragment: &str,
        limit: usize,
    ) -> ExpertiseResult<Vec<AuthorInfo>>;

    // --- Aggregates ---
    fn total_documents(&self) -> ExpertiseResult<u64>;
    fn total_authors(&self) -> ExpertiseResult<u64>;
    fn total_entities(&self) -> ExpertiseResult<u64>;
    fn author_document_count(&self, author_id: &str) -> ExpertiseResult<u64>;
    /// Document count of every author, ascending.
    fn author_document_counts(&self) -> ExpertiseResult<Vec<u64>>;

    /// Corpus size matching a popularity measure: documents or authors.
    fn corpus_size(&self, measure: PopularityMeasure) -> ExpertiseResult<u64> {
        match measure {
            PopularityMeasure::Documents => self.total_documents(),
            PopularityMeasure::Authors => self.total_authors(),
        }
    }

    // --- Maintenance ---
    /// Remove every author, entity and document.
    fn erase(&self) -> ExpertiseResult<()>;
}
