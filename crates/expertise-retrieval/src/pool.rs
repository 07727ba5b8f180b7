//! Concurrent query execution over a shared [`ExpertFinder`].

use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use expertise_core::errors::{ExpertiseError, ExpertiseResult, StorageError};
use expertise_core::models::ScoringPlan;
use expertise_core::CancelToken;
use expertise_observability::{QueryLog, QueryLogEntry};

use crate::finder::{ExpertFinder, ExpertSearchResult};

/// Runs batches of queries on a dedicated rayon pool and keeps a bounded
/// log of their latencies.
pub struct QueryPool {
    finder: Arc<ExpertFinder>,
    pool: rayon::ThreadPool,
    log: Mutex<QueryLog>,
}

impl QueryPool {
    /// `threads == 0` lets rayon pick one thread per core.
    pub fn new(
        finder: Arc<ExpertFinder>,
        threads: usize,
        log_capacity: usize,
    ) -> ExpertiseResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("expertise-query-{i}"))
            .build()
            .map_err(|e| ExpertiseError::ConfigError {
                reason: format!("query thread pool: {e}"),
            })?;
        Ok(Self {
            finder,
            pool,
            log: Mutex::new(QueryLog::with_capacity(log_capacity)),
        })
    }

    pub fn finder(&self) -> &ExpertFinder {
        &self.finder
    }

    /// Run one query on the calling thread and log it.
    pub fn run_one(
        &self,
        query: &str,
        plan: &ScoringPlan,
        cancel: &CancelToken,
    ) -> ExpertiseResult<ExpertSearchResult> {
        let result = self.finder.find_expert(query, plan, cancel);
        if let Ok(found) = &result {
            self.record(found)?;
        }
        result
    }

    /// Run every query concurrently. Results come back in input order.
    pub fn run(
        &self,
        queries: &[String],
        plan: &ScoringPlan,
        cancel: &CancelToken,
    ) -> Vec<ExpertiseResult<ExpertSearchResult>> {
        self.pool.install(|| {
            queries
                .par_iter()
                .map(|query| self.run_one(query, plan, cancel))
                .collect()
        })
    }

    fn record(&self, found: &ExpertSearchResult) -> ExpertiseResult<()> {
        let entry = QueryLogEntry::new(
            &found.query,
            found.elapsed,
            found.ranking.len(),
            found.query_entities.len(),
            found
                .degradations
                .iter()
                .map(|event| event.component.clone())
                .collect(),
        );
        self.log
            .lock()
            .map_err(|e| StorageError::LockPoisoned {
                details: e.to_string(),
            })?
            .record(entry);
        Ok(())
    }

    /// Copy of the query log.
    pub fn log_snapshot(&self) -> ExpertiseResult<QueryLog> {
        let log = self.log.lock().map_err(|e| StorageError::LockPoisoned {
            details: e.to_string(),
        })?;
        Ok(log.clone())
    }
}
