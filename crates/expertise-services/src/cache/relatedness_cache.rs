//! Relatedness cache keyed by the unordered entity pair.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

use expertise_core::errors::ExpertiseResult;
use expertise_core::traits::EntityPair;

use super::persistent::PersistentTier;

pub struct RelatednessCache {
    values: DashMap<EntityPair, f64>,
    persistent: Option<Arc<PersistentTier>>,
    pending: DashMap<EntityPair, f64>,
}

impl RelatednessCache {
    pub fn new(persistent: Option<Arc<PersistentTier>>) -> Self {
        Self {
            values: DashMap::new(),
            persistent,
            pending: DashMap::new(),
        }
    }

    /// Relatedness is symmetric, so `(a, b)` and `(b, a)` share one key.
    pub fn key(a: &str, b: &str) -> EntityPair {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let key = Self::key(a, b);
        if let Some(hit) = self.values.get(&key) {
            return Some(*hit);
        }
        let persistent = self.persistent.as_ref()?;
        match persistent.get_relatedness(&key.0, &key.1) {
            Ok(Some(value)) => {
                self.values.insert(key, value);
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "relatedness cache read failed, treating as miss");
                None
            }
        }
    }

    pub fn insert(&self, a: &str, b: &str, value: f64) {
        let key = Self::key(a, b);
        if self.persistent.is_some() {
            self.pending.insert(key.clone(), value);
        }
        self.values.insert(key, value);
    }

    pub fn get_or_compute<F>(&self, a: &str, b: &str, compute: F) -> ExpertiseResult<f64>
    where
        F: FnOnce() -> ExpertiseResult<f64>,
    {
        if let Some(hit) = self.get(a, b) {
            return Ok(hit);
        }
        let value = compute()?;
        self.insert(a, b, value);
        Ok(value)
    }

    /// Pairs not yet cached, each unordered pair at most once, in first-seen order.
    pub fn missing(&self, pairs: &[EntityPair]) -> Vec<EntityPair> {
        let mut seen = HashSet::new();
        pairs
            .iter()
            .filter(|(a, b)| seen.insert(Self::key(a, b)))
            .filter(|(a, b)| self.get(a, b).is_none())
            .cloned()
            .collect()
    }

    pub fn flush(&self) -> ExpertiseResult<usize> {
        let Some(persistent) = &self.persistent else {
            return Ok(0);
        };
        let keys: Vec<EntityPair> = self.pending.iter().map(|e| e.key().clone()).collect();
        let entries: Vec<_> = keys
            .into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .collect();
        if entries.is_empty() {
            return Ok(0);
        }
        match persistent.put_relatedness(&entries) {
            Ok(written) => Ok(written),
            Err(e) => {
                for (key, value) in entries {
                    self.pending.entry(key).or_insert(value);
                }
                Err(e)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
