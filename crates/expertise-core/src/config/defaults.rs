//! Compiled defaults. Every config struct reads its `Default` from here.

// Storage
pub const DEFAULT_DB_PATH: &str = "expertise.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// Ingestion
pub const DEFAULT_MIN_DOCUMENT_LENGTH: usize = 10;
pub const DEFAULT_MIN_ANNOTATION_SCORE: f64 = 0.0;

// Scoring
pub const DEFAULT_MIN_AUTHOR_ENTITY_SCORE: f64 = 0.20;
pub const DEFAULT_RELATEDNESS_ALPHA: f64 = 1e-5;
pub const DEFAULT_RELATEDNESS_EXPONENT: f64 = 10.0;
pub const DEFAULT_RELATEDNESS_TOP_K: usize = 5;

// Retrieval
pub const DEFAULT_CITING_MIN_SCORE: f64 = 0.20;
pub const DEFAULT_QUERY_MIN_SCORE: f64 = 0.20;
pub const DEFAULT_TERM_TOP_K: usize = 40;

// Services
pub const DEFAULT_ANNOTATOR_ENDPOINT: &str = "https://tagme.d4science.org/tagme";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_SERVICE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 50;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 2_000;
pub const DEFAULT_ANNOTATION_CACHE_CAPACITY: u64 = 10_000;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1_000;
