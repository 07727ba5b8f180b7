/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Floating-point tolerance used when comparing normalized scores.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Maximum number of pairs sent in a single relatedness request.
pub const MAX_RELATEDNESS_BATCH: usize = 100;

/// Maximum number of author name completions returned by a store lookup.
pub const MAX_NAME_COMPLETIONS: usize = 50;
