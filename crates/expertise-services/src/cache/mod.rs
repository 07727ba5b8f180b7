//! Caches in front of the external services, with an explicit lifecycle:
//! opened once, shared by every component, flushed and closed at shutdown.

mod annotation_cache;
mod persistent;
mod relatedness_cache;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use expertise_core::config::ServicesConfig;
use expertise_core::errors::ExpertiseResult;

pub use annotation_cache::AnnotationCache;
pub use persistent::PersistentTier;
pub use relatedness_cache::RelatednessCache;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub annotations: usize,
    pub relatedness: usize,
}

pub struct ServiceCaches {
    annotations: Arc<AnnotationCache>,
    relatedness: Arc<RelatednessCache>,
    closed: AtomicBool,
}

impl ServiceCaches {
    /// Build both caches; with `cache_path` set they share one SQLite file.
    pub fn open(config: &ServicesConfig) -> ExpertiseResult<Self> {
        let persistent = match &config.cache_path {
            Some(path) => Some(Arc::new(PersistentTier::open(Path::new(path))?)),
            None => None,
        };
        info!(
            capacity = config.annotation_cache_capacity,
            persistent = persistent.is_some(),
            "service caches opened"
        );
        Ok(Self::with_tier(config.annotation_cache_capacity, persistent))
    }

    pub fn in_memory(annotation_capacity: u64) -> Self {
        Self::with_tier(annotation_capacity, None)
    }

    fn with_tier(annotation_capacity: u64, persistent: Option<Arc<PersistentTier>>) -> Self {
        Self {
            annotations: Arc::new(AnnotationCache::new(annotation_capacity, persistent.clone())),
            relatedness: Arc::new(RelatednessCache::new(persistent)),
            closed: AtomicBool::new(false),
        }
    }

    pub fn annotations(&self) -> Arc<AnnotationCache> {
        Arc::clone(&self.annotations)
    }

    pub fn relatedness(&self) -> Arc<RelatednessCache> {
        Arc::clone(&self.relatedness)
    }

    pub fn flush(&self) -> ExpertiseResult<FlushReport> {
        let report = FlushReport {
            annotations: self.annotations.flush()?,
            relatedness: self.relatedness.flush()?,
        };
        if report != FlushReport::default() {
            info!(
                annotations = report.annotations,
                relatedness = report.relatedness,
                "service caches flushed"
            );
        }
        Ok(report)
    }

    /// Flush and mark closed; dropping a closed cache does nothing more.
    pub fn close(&self) -> ExpertiseResult<FlushReport> {
        let report = self.flush()?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(report)
    }
}

impl Drop for ServiceCaches {
    fn drop(&mut self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(error = %e, "service caches not flushed on drop");
        }
    }
}
