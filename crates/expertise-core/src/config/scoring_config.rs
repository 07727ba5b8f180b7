use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::PopularityMeasure;

/// Author scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Which count feeds the IAF denominator.
    pub popularity_measure: PopularityMeasure,
    /// Author entities below this max score are ignored by cosine and relatedness scoring.
    pub min_author_entity_score: f64,
    /// Smoothing term of the geometric relatedness score.
    pub relatedness_alpha: f64,
    /// Exponent of the geometric relatedness score.
    pub relatedness_exponent: f64,
    /// Most related author entities kept per query entity.
    pub relatedness_top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            popularity_measure: PopularityMeasure::default(),
            min_author_entity_score: defaults::DEFAULT_MIN_AUTHOR_ENTITY_SCORE,
            relatedness_alpha: defaults::DEFAULT_RELATEDNESS_ALPHA,
            relatedness_exponent: defaults::DEFAULT_RELATEDNESS_EXPONENT,
            relatedness_top_k: defaults::DEFAULT_RELATEDNESS_TOP_K,
        }
    }
}
