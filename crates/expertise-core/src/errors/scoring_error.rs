/// Scoring subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("unrecognized scoring function: {name}")]
    UnknownScoringFunction { name: String },

    #[error("invalid scoring plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("relatedness for ({a}, {b}) was not prefetched")]
    MissingRelatedness { a: String, b: String },

    #[error("score undefined: {reason}")]
    Undefined { reason: String },
}
