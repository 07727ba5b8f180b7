use serde::{Deserialize, Serialize};

use super::defaults;

/// Annotation and relatedness service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL; `/tag` and `/rel` are appended.
    pub endpoint: String,
    /// Access token sent as `gcube-token`.
    pub token: String,
    pub lang: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub annotation_cache_capacity: u64,
    /// SQLite file backing the service caches across runs. In-memory only if unset.
    pub cache_path: Option<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ANNOTATOR_ENDPOINT.to_string(),
            token: String::new(),
            lang: defaults::DEFAULT_LANG.to_string(),
            timeout_ms: defaults::DEFAULT_SERVICE_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            annotation_cache_capacity: defaults::DEFAULT_ANNOTATION_CACHE_CAPACITY,
            cache_path: None,
        }
    }
}
