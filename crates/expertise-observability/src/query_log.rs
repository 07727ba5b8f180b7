//! Query performance log: query text, latency, result count, matched entities, degraded signals.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use expertise_core::config::ObservabilityConfig;

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub latency: Duration,
    pub result_count: usize,
    pub query_entities: usize,
    /// Components that fell back to an empty result.
    pub degraded: Vec<String>,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query: impl Into<String>,
        latency: Duration,
        result_count: usize,
        query_entities: usize,
        degraded: Vec<String>,
    ) -> Self {
        Self {
            query: query.into(),
            latency,
            result_count,
            query_entities,
            degraded,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded, append-only query log. The oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: Vec<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(ObservabilityConfig::default().query_log_capacity)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(config: &ObservabilityConfig) -> Self {
        Self::with_capacity(config.query_log_capacity)
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query,
            latency_ms = entry.latency.as_millis() as u64,
            result_count = entry.result_count,
            query_entities = entry.query_entities,
            degraded = ?entry.degraded,
            "query logged"
        );

        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.drain(..self.entries.len() - self.max_entries);
        }
    }

    pub fn entries(&self) -> &[QueryLogEntry] {
        &self.entries
    }

    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0-1.0), nearest rank.
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }

    /// Number of logged queries where at least one signal degraded.
    pub fn degraded_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.degraded.is_empty()).count()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
