//! Everything a scoring function reads besides the author record.

use std::collections::HashMap;

use expertise_core::config::ScoringConfig;
use expertise_core::errors::ScoringError;
use expertise_core::models::EntityId;
use expertise_core::traits::EntityPair;

use crate::iaf::query_weights;

/// Prefetched relatedness values keyed by the unordered entity pair.
#[derive(Debug, Clone, Default)]
pub struct RelatednessTable {
    values: HashMap<EntityPair, f64>,
}

impl RelatednessTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> EntityPair {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn insert(&mut self, a: &str, b: &str, value: f64) {
        self.values.insert(Self::key(a, b), value);
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.values.get(&Self::key(a, b)).copied()
    }

    /// Like [`get`](Self::get), but a pair that was never prefetched is an error.
    pub fn lookup(&self, a: &str, b: &str) -> Result<f64, ScoringError> {
        self.get(a, b).ok_or_else(|| ScoringError::MissingRelatedness {
            a: a.to_string(),
            b: b.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(EntityPair, f64)> for RelatednessTable {
    fn from_iter<I: IntoIterator<Item = (EntityPair, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for ((a, b), value) in iter {
            table.insert(&a, &b, value);
        }
        table
    }
}

/// Query-side inputs shared by every author scored for one query.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    /// Query entity ids, deduplicated, in extraction order.
    pub query_entities: Vec<EntityId>,
    /// IAF weight per query entity with a known popularity.
    pub weights: HashMap<EntityId, f64>,
    /// Popularity of query entities and, for cosine scoring, of candidate authors' entities.
    pub popularity: HashMap<EntityId, u64>,
    pub corpus_size: u64,
    pub relatedness: RelatednessTable,
    pub config: ScoringConfig,
}

impl ScoringContext {
    pub fn new(
        query_entities: Vec<EntityId>,
        popularity: HashMap<EntityId, u64>,
        corpus_size: u64,
        config: ScoringConfig,
    ) -> Self {
        let weights = query_weights(&query_entities, &popularity, corpus_size);
        Self {
            query_entities,
            weights,
            popularity,
            corpus_size,
            relatedness: RelatednessTable::new(),
            config,
        }
    }

    pub fn with_relatedness(mut self, relatedness: RelatednessTable) -> Self {
        self.relatedness = relatedness;
        self
    }

    /// IAF of any entity (not scaled by the query size).
    pub fn iaf(&self, entity: &str) -> Option<f64> {
        let popularity = *self.popularity.get(entity)?;
        crate::iaf::inverse_frequency(self.corpus_size, popularity)
    }
}
