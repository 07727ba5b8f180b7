//! Service wrappers that consult the shared caches before the network.

use std::sync::Arc;

use tracing::debug;

use expertise_core::constants::MAX_RELATEDNESS_BATCH;
use expertise_core::errors::{ExpertiseResult, ScoringError};
use expertise_core::models::Annotation;
use expertise_core::traits::{EntityPair, IEntityAnnotator, IRelatednessProvider};
use expertise_core::CancelToken;

use crate::cache::{AnnotationCache, RelatednessCache};

pub struct CachedAnnotator {
    inner: Arc<dyn IEntityAnnotator>,
    cache: Arc<AnnotationCache>,
}

impl CachedAnnotator {
    pub fn new(inner: Arc<dyn IEntityAnnotator>, cache: Arc<AnnotationCache>) -> Self {
        Self { inner, cache }
    }
}

impl IEntityAnnotator for CachedAnnotator {
    fn annotate(&self, text: &str, cancel: &CancelToken) -> ExpertiseResult<Vec<Annotation>> {
        self.cache
            .get_or_compute(text, || self.inner.annotate(text, cancel))
    }
}

pub struct CachedRelatedness {
    inner: Arc<dyn IRelatednessProvider>,
    cache: Arc<RelatednessCache>,
}

impl CachedRelatedness {
    pub fn new(inner: Arc<dyn IRelatednessProvider>, cache: Arc<RelatednessCache>) -> Self {
        Self { inner, cache }
    }

    /// Fetch every uncached pair in batched calls; returns how many were fetched.
    pub fn prefetch(&self, pairs: &[EntityPair], cancel: &CancelToken) -> ExpertiseResult<usize> {
        let missing = self.cache.missing(pairs);
        if missing.is_empty() {
            return Ok(0);
        }
        for chunk in missing.chunks(MAX_RELATEDNESS_BATCH) {
            let values = self.inner.relatedness_batch(chunk, cancel)?;
            for ((a, b), value) in chunk.iter().zip(values) {
                self.cache.insert(a, b, value);
            }
        }
        debug!(requested = pairs.len(), fetched = missing.len(), "relatedness prefetched");
        Ok(missing.len())
    }

    /// A cached value, or `MissingRelatedness` if the pair was never fetched.
    pub fn cached(&self, a: &str, b: &str) -> Result<f64, ScoringError> {
        self.cache.get(a, b).ok_or_else(|| ScoringError::MissingRelatedness {
            a: a.to_string(),
            b: b.to_string(),
        })
    }
}

impl IRelatednessProvider for CachedRelatedness {
    fn relatedness_batch(
        &self,
        pairs: &[EntityPair],
        cancel: &CancelToken,
    ) -> ExpertiseResult<Vec<f64>> {
        self.prefetch(pairs, cancel)?;
        pairs
            .iter()
            .map(|(a, b)| self.cached(a, b).map_err(Into::into))
            .collect()
    }
}
