//! Span definitions for queries, single-document ingestion and corpus builds.

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($query:expr) => {
        tracing::info_span!("expertise.query", query = %$query)
    };
    ($query:expr, $plan:expr) => {
        tracing::info_span!("expertise.query", query = %$query, plan = %$plan)
    };
}

/// Create an ingestion span for one document.
#[macro_export]
macro_rules! ingest_span {
    ($author_id:expr, $year:expr) => {
        tracing::debug_span!("expertise.ingest", author_id = %$author_id, year = $year)
    };
}

/// Create a corpus build span.
#[macro_export]
macro_rules! build_span {
    ($papers:expr) => {
        tracing::info_span!("expertise.build", papers = $papers)
    };
}

pub mod names {
    pub const QUERY: &str = "expertise.query";
    pub const INGEST: &str = "expertise.ingest";
    pub const BUILD: &str = "expertise.build";
}
