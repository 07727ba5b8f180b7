use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::{FusionStrategy, ScoringKind, ScoringPlan, SignalSpec};

/// Query-time retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Minimum author/entity max score for an author to count as citing an entity.
    pub citing_min_score: f64,
    /// Minimum annotation confidence for a query entity to be kept.
    pub query_min_score: f64,
    /// Full-text hits fetched per query.
    pub term_top_k: usize,
    pub fusion: FusionStrategy,
    /// Signals used when a query names no plan.
    pub signals: Vec<SignalSpec>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            citing_min_score: defaults::DEFAULT_CITING_MIN_SCORE,
            query_min_score: defaults::DEFAULT_QUERY_MIN_SCORE,
            term_top_k: defaults::DEFAULT_TERM_TOP_K,
            fusion: FusionStrategy::default(),
            signals: vec![SignalSpec::new(ScoringKind::EcIaf, 1.0)],
        }
    }
}

impl RetrievalConfig {
    pub fn default_plan(&self) -> ScoringPlan {
        ScoringPlan::new(self.signals.clone(), self.fusion)
    }
}
