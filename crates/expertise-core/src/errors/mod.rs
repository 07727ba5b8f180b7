mod ingestion_error;
mod scoring_error;
mod service_error;
mod storage_error;

pub use ingestion_error::IngestionError;
pub use scoring_error::ScoringError;
pub use service_error::ServiceError;
pub use storage_error::StorageError;

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ExpertiseError {
    #[error("author not found: {author_id}")]
    AuthorNotFound { author_id: String },

    #[error("document not found: {document_id}")]
    DocumentNotFound { document_id: i64 },

    #[error("operation cancelled during {stage}")]
    Cancelled { stage: String },

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("external service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("ingestion error: {0}")]
    IngestionError(#[from] IngestionError),

    #[error("scoring error: {0}")]
    ScoringError(#[from] ScoringError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ExpertiseError {
    /// Whether the error comes from an unreachable or misbehaving collaborator,
    /// i.e. whether a query-time signal should degrade instead of failing.
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Self::ServiceError(_))
    }
}

pub type ExpertiseResult<T> = Result<T, ExpertiseError>;
