/// Errors raised by external collaborators (annotation, relatedness, full-text search).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    #[error("{service}: all {attempts} attempts failed: {last_error}")]
    RetriesExhausted {
        service: String,
        attempts: u32,
        last_error: String,
    },

    #[error("{service} timed out after {timeout_ms}ms")]
    Timeout { service: String, timeout_ms: u64 },

    #[error("{service} returned an invalid response: {reason}")]
    InvalidResponse { service: String, reason: String },
}
