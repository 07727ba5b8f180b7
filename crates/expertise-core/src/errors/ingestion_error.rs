/// Fatal per-document ingestion errors. Short documents are not errors:
/// they are reported as a skipped outcome.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("author metadata is missing required field `{field}`")]
    MissingAuthorField { field: String },

    #[error("document of author {author_id} belongs to a different author ({document_author})")]
    AuthorMismatch {
        author_id: String,
        document_author: String,
    },

    #[error("invalid corpus record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}
