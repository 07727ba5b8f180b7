//! Candidate retrieval for the entity and term signals.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::{AuthorId, EntityId, TermAuthorHits, TermHit};
use expertise_core::traits::{IFullTextSearch, IStatisticsStore};

/// Authors citing any query entity with enough confidence, answered from
/// the store's entity → author index.
pub struct EntityCandidateRetriever {
    store: Arc<dyn IStatisticsStore>,
    min_score: f64,
}

impl EntityCandidateRetriever {
    pub fn new(store: Arc<dyn IStatisticsStore>, min_score: f64) -> Self {
        Self { store, min_score }
    }

    pub fn citing_authors(&self, query_entities: &[EntityId]) -> ExpertiseResult<Vec<AuthorId>> {
        if query_entities.is_empty() {
            return Ok(Vec::new());
        }
        let authors = self.store.citing_authors(query_entities, self.min_score)?;
        debug!(
            query_entities = query_entities.len(),
            authors = authors.len(),
            min_score = self.min_score,
            "citing authors found"
        );
        Ok(authors)
    }
}

/// Full-text search grouped per author.
pub struct TermCandidateRetriever {
    search: Arc<dyn IFullTextSearch>,
    top_k: usize,
}

impl TermCandidateRetriever {
    pub fn new(search: Arc<dyn IFullTextSearch>, top_k: usize) -> Self {
        Self { search, top_k }
    }

    pub fn retrieve(&self, query: &str) -> ExpertiseResult<Vec<TermAuthorHits>> {
        let hits = self.search.search(query, self.top_k)?;
        debug!(hits = hits.len(), top_k = self.top_k, "full-text hits");
        Ok(group_term_hits(hits))
    }
}

/// Group hits under their author, authors in order of their best hit.
pub fn group_term_hits(hits: Vec<TermHit>) -> Vec<TermAuthorHits> {
    let mut index: HashMap<AuthorId, usize> = HashMap::new();
    let mut grouped: Vec<TermAuthorHits> = Vec::new();
    for hit in hits {
        let slot = *index.entry(hit.author_id.clone()).or_insert_with(|| {
            grouped.push(TermAuthorHits::new(&hit.author_id, &hit.author_name));
            grouped.len() - 1
        });
        let author = &mut grouped[slot];
        author.documents.insert(hit.document_id, hit.year);
        author.scores.insert(hit.document_id, hit.score);
    }
    grouped
}
