//! Structured log events emitted at stage boundaries.

use std::time::Duration;

/// A signal fell back to an empty result.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "signal degraded"
    );
}

pub fn query_completed(query: &str, results: usize, query_entities: usize, elapsed: Duration) {
    tracing::info!(
        event = "query_completed",
        query = %query,
        results = results,
        query_entities = query_entities,
        elapsed_ms = elapsed.as_millis() as u64,
        "query completed"
    );
}

pub fn build_completed(indexed: usize, skipped: usize, failed: usize, elapsed: Duration) {
    tracing::info!(
        event = "build_completed",
        indexed = indexed,
        skipped = skipped,
        failed = failed,
        elapsed_ms = elapsed.as_millis() as u64,
        "corpus build completed"
    );
}
