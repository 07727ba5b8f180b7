use serde::{Deserialize, Serialize};

use super::defaults;

/// Corpus ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Documents whose body is not longer than this many characters are skipped.
    pub min_document_length: usize,
    /// Annotations below this confidence are dropped before aggregation.
    pub min_annotation_score: f64,
    /// Inclusive lower bound on publication year, if any.
    pub min_year: Option<i32>,
    /// Inclusive upper bound on publication year, if any.
    pub max_year: Option<i32>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            min_document_length: defaults::DEFAULT_MIN_DOCUMENT_LENGTH,
            min_annotation_score: defaults::DEFAULT_MIN_ANNOTATION_SCORE,
            min_year: None,
            max_year: None,
        }
    }
}

impl IngestionConfig {
    pub fn accepts_year(&self, year: i32) -> bool {
        self.min_year.map_or(true, |min| year >= min)
            && self.max_year.map_or(true, |max| year <= max)
    }
}
