use std::time::Duration;

use expertise_core::config::ObservabilityConfig;
use expertise_observability::{QueryLog, QueryLogEntry};

fn entry(query: &str, ms: u64, degraded: &[&str]) -> QueryLogEntry {
    QueryLogEntry::new(
        query,
        Duration::from_millis(ms),
        10,
        2,
        degraded.iter().map(|s| s.to_string()).collect(),
    )
}

#[test]
fn empty_log_reports_zero() {
    let log = QueryLog::new();
    assert_eq!(log.count(), 0);
    assert_eq!(log.avg_latency(), Duration::ZERO);
    assert_eq!(log.latency_percentile(0.95), Duration::ZERO);
}

#[test]
fn average_and_percentiles() {
    let mut log = QueryLog::new();
    for ms in [10, 20, 30, 40, 50] {
        log.record(entry("q", ms, &[]));
    }
    assert_eq!(log.avg_latency(), Duration::from_millis(30));
    assert_eq!(log.latency_percentile(0.0), Duration::from_millis(10));
    assert_eq!(log.latency_percentile(0.5), Duration::from_millis(30));
    assert_eq!(log.latency_percentile(1.0), Duration::from_millis(50));
}

#[test]
fn capacity_drops_oldest() {
    let mut log = QueryLog::with_capacity(3);
    for i in 0..5u64 {
        log.record(entry(&format!("q{i}"), i, &[]));
    }
    let queries: Vec<_> = log.entries().iter().map(|e| e.query.as_str()).collect();
    assert_eq!(queries, vec!["q2", "q3", "q4"]);
}

#[test]
fn counts_degraded_queries() {
    let mut log = QueryLog::from_config(&ObservabilityConfig::default());
    log.record(entry("ok", 5, &[]));
    log.record(entry("partial", 5, &["term_max"]));
    assert_eq!(log.degraded_count(), 1);
}

#[test]
fn init_tracing_is_idempotent() {
    expertise_observability::init_tracing("warn", false);
    expertise_observability::init_tracing("debug", true);
    let _span = expertise_observability::query_span!("graph mining").entered();
    tracing::info!("inside query span");
}
