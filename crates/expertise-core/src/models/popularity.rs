use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{AuthorId, DocumentId, EntityId};

/// Which count an entity's popularity (the IAF denominator) is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopularityMeasure {
    /// Number of documents mentioning the entity; the corpus size is the document count.
    #[default]
    Documents,
    /// Number of authors citing the entity; the corpus size is the author count.
    Authors,
}

/// One author's usage of an entity, as seen from the entity side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorOccurrence {
    pub count: u32,
    pub max_score: f64,
    /// Publication years, deduplicated.
    pub years: BTreeSet<i32>,
}

/// Corpus-wide record of an entity. Only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPopularity {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub institutions: BTreeSet<String>,
    pub occurrences: BTreeMap<AuthorId, AuthorOccurrence>,
    pub documents: Vec<DocumentId>,
}

impl EntityPopularity {
    pub fn new(entity_id: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_name: entity_name.into(),
            institutions: BTreeSet::new(),
            occurrences: BTreeMap::new(),
            documents: Vec::new(),
        }
    }

    pub fn popularity(&self, measure: PopularityMeasure) -> u64 {
        match measure {
            PopularityMeasure::Documents => self.documents.len() as u64,
            PopularityMeasure::Authors => self.occurrences.len() as u64,
        }
    }

    /// Authors whose best annotation of this entity reaches `min_score`.
    pub fn citing_authors(&self, min_score: f64) -> impl Iterator<Item = &AuthorId> {
        self.occurrences
            .iter()
            .filter(move |(_, occ)| occ.max_score >= min_score)
            .map(|(author_id, _)| author_id)
    }
}
