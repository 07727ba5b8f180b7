//! Corpus construction: filter, group by author, annotate, aggregate.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use expertise_core::errors::{ExpertiseError, ExpertiseResult};
use expertise_core::traits::IEntityAnnotator;
use expertise_core::CancelToken;
use expertise_observability::build_span;
use expertise_observability::tracing_setup::events;

use crate::aggregator::{Aggregator, IngestOutcome};
use crate::reader::Paper;

/// Counts of one build. Per-document failures are counted, never propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Papers outside the configured year range.
    pub filtered: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BuildReport {
    fn merge(self, other: Self) -> Self {
        Self {
            filtered: self.filtered + other.filtered,
            indexed: self.indexed + other.indexed,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }

    pub fn processed(&self) -> usize {
        self.indexed + self.skipped + self.failed
    }
}

pub struct CorpusBuilder {
    aggregator: Arc<Aggregator>,
    annotator: Arc<dyn IEntityAnnotator>,
}

impl CorpusBuilder {
    pub fn new(aggregator: Arc<Aggregator>, annotator: Arc<dyn IEntityAnnotator>) -> Self {
        Self {
            aggregator,
            annotator,
        }
    }

    /// Remove all statistics. Rebuilding is the only way to undo ingestion.
    pub fn erase(&self) -> ExpertiseResult<()> {
        self.aggregator.store().erase()?;
        info!("statistics erased");
        Ok(())
    }

    /// Ingest `papers`. Authors are processed in parallel, each author's
    /// papers in input order.
    pub fn build(&self, papers: Vec<Paper>, cancel: &CancelToken) -> ExpertiseResult<BuildReport> {
        let started = Instant::now();
        let _span = build_span!(papers.len()).entered();

        let total = papers.len();
        let config = self.aggregator.config();
        let (kept, out_of_range): (Vec<Paper>, Vec<Paper>) =
            papers.into_iter().partition(|p| config.accepts_year(p.year));
        log_corpus_shape(total, &kept, self.aggregator.as_ref());

        let mut by_author: BTreeMap<String, Vec<Paper>> = BTreeMap::new();
        for paper in kept {
            by_author.entry(paper.author_id.clone()).or_default().push(paper);
        }
        let groups: Vec<(String, Vec<Paper>)> = by_author.into_iter().collect();

        let report = groups
            .par_iter()
            .map(|(_, papers)| self.build_author(papers, cancel))
            .reduce(BuildReport::default, BuildReport::merge);
        cancel.check("build")?;

        let report = BuildReport {
            filtered: out_of_range.len(),
            ..report
        };
        events::build_completed(report.indexed, report.skipped, report.failed, started.elapsed());
        Ok(report)
    }

    fn build_author(&self, papers: &[Paper], cancel: &CancelToken) -> BuildReport {
        let mut report = BuildReport::default();
        for paper in papers {
            if cancel.is_cancelled() {
                break;
            }
            match self.ingest_paper(paper, cancel) {
                Ok(IngestOutcome::Indexed { .. }) => report.indexed += 1,
                Ok(IngestOutcome::Skipped { .. }) => report.skipped += 1,
                Err(ExpertiseError::Cancelled { .. }) => break,
                Err(e) => {
                    warn!(
                        author_id = %paper.author_id,
                        year = paper.year,
                        error = %e,
                        "paper not ingested"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Short bodies are skipped before they reach the annotator.
    fn ingest_paper(&self, paper: &Paper, cancel: &CancelToken) -> ExpertiseResult<IngestOutcome> {
        let author = paper.author_info();
        let document = paper.document();
        Aggregator::validate(&author, &document)?;
        if let Some(reason) = self.aggregator.skip_reason(&document.body) {
            return Ok(IngestOutcome::Skipped { reason });
        }
        let annotations = self.annotator.annotate(&document.body, cancel)?;
        self.aggregator.ingest(&author, &document, &annotations)
    }
}

fn log_corpus_shape(total: usize, kept: &[Paper], aggregator: &Aggregator) {
    let percent = |n: usize| {
        if kept.is_empty() {
            0.0
        } else {
            n as f64 * 100.0 / kept.len() as f64
        }
    };
    let with_abstract = kept
        .iter()
        .filter(|p| aggregator.skip_reason(&p.body).is_none())
        .count();
    let doi_only = kept
        .iter()
        .filter(|p| p.doi.is_some() && aggregator.skip_reason(&p.body).is_some())
        .count();
    info!(
        papers = total,
        in_year_range = kept.len(),
        with_abstract_pct = percent(with_abstract),
        doi_without_abstract_pct = percent(doi_only),
        "corpus loaded"
    );
}
