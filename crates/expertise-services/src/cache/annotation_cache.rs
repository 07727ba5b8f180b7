//! Annotation cache: moka in memory, keyed by the blake3 hash of the text,
//! with an optional persistent tier behind it.

use std::sync::Arc;

use dashmap::DashMap;
use moka::sync::Cache;
use tracing::{debug, warn};

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::Annotation;

use super::persistent::PersistentTier;

pub struct AnnotationCache {
    memory: Cache<String, Arc<Vec<Annotation>>>,
    persistent: Option<Arc<PersistentTier>>,
    /// Entries not yet written to the persistent tier.
    pending: DashMap<String, Arc<Vec<Annotation>>>,
}

impl AnnotationCache {
    pub fn new(capacity: u64, persistent: Option<Arc<PersistentTier>>) -> Self {
        Self {
            memory: Cache::builder().max_capacity(capacity).build(),
            persistent,
            pending: DashMap::new(),
        }
    }

    pub fn key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Memory first, then the persistent tier; persistent hits are promoted.
    pub fn get(&self, text: &str) -> Option<Vec<Annotation>> {
        let key = Self::key(text);
        if let Some(hit) = self.memory.get(&key) {
            return Some(hit.as_ref().clone());
        }
        let persistent = self.persistent.as_ref()?;
        match persistent.get_annotations(&key) {
            Ok(Some(annotations)) => {
                debug!(key = %key, "annotation cache persistent hit");
                self.memory.insert(key, Arc::new(annotations.clone()));
                Some(annotations)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "annotation cache read failed, treating as miss");
                None
            }
        }
    }

    pub fn insert(&self, text: &str, annotations: Vec<Annotation>) {
        let key = Self::key(text);
        let value = Arc::new(annotations);
        if self.persistent.is_some() {
            self.pending.insert(key.clone(), Arc::clone(&value));
        }
        self.memory.insert(key, value);
    }

    /// Return the cached annotations or compute and cache them. Concurrent
    /// callers may compute the same text twice; the results are identical.
    /// Failures are not cached.
    pub fn get_or_compute<F>(&self, text: &str, compute: F) -> ExpertiseResult<Vec<Annotation>>
    where
        F: FnOnce() -> ExpertiseResult<Vec<Annotation>>,
    {
        if let Some(hit) = self.get(text) {
            return Ok(hit);
        }
        let annotations = compute()?;
        self.insert(text, annotations.clone());
        Ok(annotations)
    }

    /// Write pending entries to the persistent tier; returns how many were written.
    pub fn flush(&self) -> ExpertiseResult<usize> {
        let Some(persistent) = &self.persistent else {
            return Ok(0);
        };
        let keys: Vec<String> = self.pending.iter().map(|e| e.key().clone()).collect();
        let entries: Vec<_> = keys
            .into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .collect();
        if entries.is_empty() {
            return Ok(0);
        }
        match persistent.put_annotations(&entries) {
            Ok(written) => Ok(written),
            Err(e) => {
                for (key, value) in entries {
                    self.pending.entry(key).or_insert(value);
                }
                Err(e)
            }
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> u64 {
        self.memory.run_pending_tasks();
        self.memory.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
