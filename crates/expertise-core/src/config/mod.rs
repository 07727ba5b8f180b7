//! Layered configuration: compiled defaults, then a TOML file, then
//! `EXPERTISE_*` environment variables.

pub mod defaults;
mod ingestion_config;
mod observability_config;
mod retrieval_config;
mod scoring_config;
mod services_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use ingestion_config::IngestionConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use scoring_config::ScoringConfig;
pub use services_config::ServicesConfig;
pub use storage_config::StorageConfig;

use crate::errors::{ExpertiseError, ExpertiseResult};

/// Top-level configuration aggregating all sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpertiseConfig {
    pub storage: StorageConfig,
    pub ingestion: IngestionConfig,
    pub scoring: ScoringConfig,
    pub retrieval: RetrievalConfig,
    pub services: ServicesConfig,
    pub observability: ObservabilityConfig,
}

impl ExpertiseConfig {
    /// Parse a TOML string. Missing sections and fields take their defaults.
    pub fn from_toml(toml_str: &str) -> ExpertiseResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ExpertiseError::ConfigError {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ExpertiseResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExpertiseError::ConfigError {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if given, otherwise defaults; then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ExpertiseResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `EXPERTISE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("EXPERTISE_DB_PATH") {
            self.storage.db_path = db_path;
        }
        if let Some(endpoint) = lookup("EXPERTISE_SERVICE_ENDPOINT") {
            self.services.endpoint = endpoint;
        }
        if let Some(token) = lookup("EXPERTISE_SERVICE_TOKEN") {
            self.services.token = token;
        }
        if let Some(cache_path) = lookup("EXPERTISE_CACHE_PATH") {
            self.services.cache_path = Some(cache_path);
        }
    }

    pub fn validate(&self) -> ExpertiseResult<()> {
        let unit_interval = [
            ("ingestion.min_annotation_score", self.ingestion.min_annotation_score),
            ("scoring.min_author_entity_score", self.scoring.min_author_entity_score),
            ("retrieval.citing_min_score", self.retrieval.citing_min_score),
            ("retrieval.query_min_score", self.retrieval.query_min_score),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be greater than 0"));
        }
        if self.retrieval.term_top_k == 0 {
            return Err(invalid("retrieval.term_top_k", "must be greater than 0"));
        }
        if self.scoring.relatedness_top_k == 0 {
            return Err(invalid("scoring.relatedness_top_k", "must be greater than 0"));
        }
        if self.scoring.relatedness_alpha <= 0.0 {
            return Err(invalid("scoring.relatedness_alpha", "must be positive"));
        }
        if let (Some(min), Some(max)) = (self.ingestion.min_year, self.ingestion.max_year) {
            if min > max {
                return Err(invalid("ingestion.min_year", "must not exceed max_year"));
            }
        }
        if self.services.initial_backoff_ms > self.services.max_backoff_ms {
            return Err(invalid(
                "services.initial_backoff_ms",
                "must not exceed max_backoff_ms",
            ));
        }
        self.retrieval
            .default_plan()
            .validate()
            .map_err(|e| invalid("retrieval.signals", &e.to_string()))
    }
}

fn invalid(field: &str, message: &str) -> ExpertiseError {
    ExpertiseError::ConfigError {
        reason: format!("{field}: {message}"),
    }
}
