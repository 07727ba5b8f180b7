//! ExpertFinder: runs one query through extraction, retrieval, scoring and fusion.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use expertise_core::config::{ExpertiseConfig, RetrievalConfig, ScoringConfig};
use expertise_core::constants::MAX_NAME_COMPLETIONS;
use expertise_core::errors::{ExpertiseError, ExpertiseResult, ServiceError};
use expertise_core::models::{
    sort_ranked, Author, AuthorId, AuthorInfo, AuthorProfile, DegradationEvent, EntityId,
    QueryEntity, RankedAuthor, ScoringKind, ScoringPlan, SignalFamily, StoredDocument,
    TermAuthorHits,
};
use expertise_core::traits::{
    IEntityAnnotator, IFullTextSearch, IRelatednessProvider, IStatisticsStore,
};
use expertise_core::CancelToken;
use expertise_observability::query_span;
use expertise_observability::tracing_setup::events;
use expertise_scoring::fusion::fuse;
use expertise_scoring::{
    relatedness_pairs, score_authors, score_term_authors, RelatednessTable, ScoringContext,
};

use crate::candidates::{EntityCandidateRetriever, TermCandidateRetriever};
use crate::profile::build_profile;
use crate::query_entities::extract_query_entities;
use crate::stages::{StageClock, StageTimings};

/// One signal's ranking, before fusion.
#[derive(Debug, Clone, Serialize)]
pub struct SignalResult {
    pub kind: ScoringKind,
    pub weight: f64,
    /// Raw scores, best first.
    pub ranking: Vec<RankedAuthor>,
    /// Set when the signal fell back to an empty ranking.
    pub degraded: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertSearchResult {
    pub query: String,
    pub ranking: Vec<RankedAuthor>,
    pub signals: Vec<SignalResult>,
    pub query_entities: Vec<QueryEntity>,
    pub timings: StageTimings,
    pub degradations: Vec<DegradationEvent>,
    pub elapsed: Duration,
}

impl ExpertSearchResult {
    pub fn top(&self, n: usize) -> &[RankedAuthor] {
        &self.ranking[..n.min(self.ranking.len())]
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Candidates of the entity family and what scoring them needs.
struct EntityInput {
    authors: Vec<Author>,
    /// Citing authors without a statistics record.
    missing: Vec<AuthorId>,
    ctx: ScoringContext,
    /// False when relatedness could not be fetched.
    relatedness_ready: bool,
}

/// The query engine. Shared by reference across concurrent queries; it
/// holds no per-query state.
pub struct ExpertFinder {
    store: Arc<dyn IStatisticsStore>,
    annotator: Arc<dyn IEntityAnnotator>,
    relatedness: Arc<dyn IRelatednessProvider>,
    entity_candidates: EntityCandidateRetriever,
    term_candidates: TermCandidateRetriever,
    scoring: ScoringConfig,
    retrieval: RetrievalConfig,
}

impl ExpertFinder {
    pub fn new(
        store: Arc<dyn IStatisticsStore>,
        full_text: Arc<dyn IFullTextSearch>,
        annotator: Arc<dyn IEntityAnnotator>,
        relatedness: Arc<dyn IRelatednessProvider>,
        scoring: ScoringConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            entity_candidates: EntityCandidateRetriever::new(
                Arc::clone(&store),
                retrieval.citing_min_score,
            ),
            term_candidates: TermCandidateRetriever::new(full_text, retrieval.term_top_k),
            store,
            annotator,
            relatedness,
            scoring,
            retrieval,
        }
    }

    pub fn from_config(
        store: Arc<dyn IStatisticsStore>,
        full_text: Arc<dyn IFullTextSearch>,
        annotator: Arc<dyn IEntityAnnotator>,
        relatedness: Arc<dyn IRelatednessProvider>,
        config: &ExpertiseConfig,
    ) -> Self {
        Self::new(
            store,
            full_text,
            annotator,
            relatedness,
            config.scoring.clone(),
            config.retrieval.clone(),
        )
    }

    /// The plan used when a caller names none.
    pub fn default_plan(&self) -> ScoringPlan {
        self.retrieval.default_plan()
    }

    /// Rank authors for `query` with every signal of `plan`.
    ///
    /// Cancellation is checked before each stage. A signal whose retrieval
    /// or scoring fails is reported in `degradations` and contributes an
    /// empty ranking with its weight unchanged.
    pub fn find_expert(
        &self,
        query: &str,
        plan: &ScoringPlan,
        cancel: &CancelToken,
    ) -> ExpertiseResult<ExpertSearchResult> {
        plan.validate()?;
        let started = Instant::now();
        let _span = query_span!(query).entered();
        let mut clock = StageClock::start();
        let mut degradations = Vec::new();
        let uses_entities = plan.uses_family(SignalFamily::Entity);
        let uses_terms = plan.uses_family(SignalFamily::Term);

        cancel.check(clock.current().name())?;
        let mut entities_ok = true;
        let query_entities = if uses_entities {
            match self.annotator.annotate(query, cancel) {
                Ok(annotations) => {
                    extract_query_entities(&annotations, self.retrieval.query_min_score)
                }
                Err(e) => {
                    absorb(&mut degradations, "entity_extraction", e)?;
                    entities_ok = false;
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        let entity_ids: Vec<EntityId> =
            query_entities.iter().map(|e| e.entity_id.clone()).collect();
        debug!(query_entities = ?entity_ids, "query entities extracted");
        clock.advance();

        cancel.check(clock.current().name())?;
        let mut candidates = None;
        if uses_entities && entities_ok {
            match self.load_candidates(&entity_ids) {
                Ok(found) => candidates = Some(found),
                Err(e) => absorb(&mut degradations, "entity_candidates", e)?,
            }
        }
        let mut term_hits = None;
        if uses_terms {
            match self.term_candidates.retrieve(query) {
                Ok(hits) => term_hits = Some(hits),
                Err(e) => absorb(&mut degradations, "term_candidates", e)?,
            }
        }
        clock.advance();

        cancel.check(clock.current().name())?;
        let mut entity_input = None;
        if let Some((authors, missing)) = candidates {
            match self.scoring_context(&entity_ids, &authors, plan) {
                Ok(ctx) => {
                    let mut input = EntityInput {
                        authors,
                        missing,
                        ctx,
                        relatedness_ready: true,
                    };
                    if plan.needs_relatedness() {
                        match self.relatedness_table(&entity_ids, &input.authors, cancel) {
                            Ok(table) => input.ctx = input.ctx.with_relatedness(table),
                            Err(e) => {
                                absorb(&mut degradations, "relatedness", e)?;
                                input.relatedness_ready = false;
                            }
                        }
                    }
                    entity_input = Some(input);
                }
                Err(e) => absorb(&mut degradations, "entity_statistics", e)?,
            }
        }

        let mut signals = Vec::with_capacity(plan.signals.len());
        for spec in &plan.signals {
            let signal_started = Instant::now();
            let outcome = match spec.kind.family() {
                SignalFamily::Entity => entity_input
                    .as_ref()
                    .filter(|input| input.relatedness_ready || !spec.kind.needs_relatedness())
                    .map(|input| score_entity_signal(spec.kind, input)),
                SignalFamily::Term => term_hits
                    .as_ref()
                    .map(|hits: &Vec<TermAuthorHits>| {
                        score_term_authors(spec.kind, hits).map_err(ExpertiseError::from)
                    }),
            };
            let (ranking, degraded) = match outcome {
                Some(Ok(ranking)) => (ranking, false),
                Some(Err(e)) => {
                    absorb(&mut degradations, spec.kind.name(), e)?;
                    (Vec::new(), true)
                }
                // Upstream stage already degraded.
                None => (Vec::new(), true),
            };
            signals.push(SignalResult {
                kind: spec.kind,
                weight: spec.weight,
                ranking,
                degraded,
                elapsed: signal_started.elapsed(),
            });
        }
        clock.advance();

        cancel.check(clock.current().name())?;
        let ranking = fuse(
            signals
                .iter()
                .map(|s| (s.kind.family(), s.ranking.clone(), s.weight))
                .collect(),
            plan.fusion,
        );
        let timings = clock.finish();

        let elapsed = started.elapsed();
        events::query_completed(query, ranking.len(), query_entities.len(), elapsed);
        Ok(ExpertSearchResult {
            query: query.to_string(),
            ranking,
            signals,
            query_entities,
            timings,
            degradations,
            elapsed,
        })
    }

    /// Citing authors with statistics, plus the ids that have none.
    fn load_candidates(
        &self,
        entity_ids: &[EntityId],
    ) -> ExpertiseResult<(Vec<Author>, Vec<AuthorId>)> {
        let author_ids = self.entity_candidates.citing_authors(entity_ids)?;
        let authors = self.store.get_authors(&author_ids)?;
        let missing: Vec<AuthorId> = if authors.len() == author_ids.len() {
            Vec::new()
        } else {
            let found: BTreeSet<&str> = authors.iter().map(|a| a.author_id.as_str()).collect();
            author_ids
                .into_iter()
                .filter(|id| !found.contains(id.as_str()))
                .collect()
        };
        for author_id in &missing {
            warn!(author_id = %author_id, "citing author has no statistics record, scored as zero");
        }
        Ok((authors, missing))
    }

    fn scoring_context(
        &self,
        entity_ids: &[EntityId],
        authors: &[Author],
        plan: &ScoringPlan,
    ) -> ExpertiseResult<ScoringContext> {
        let measure = self.scoring.popularity_measure;
        let mut wanted: BTreeSet<EntityId> = entity_ids.iter().cloned().collect();
        if plan.signals.iter().any(|s| s.kind == ScoringKind::CosineEfIaf) {
            for author in authors {
                wanted.extend(
                    author
                        .entities_above(self.scoring.min_author_entity_score)
                        .map(|(id, _)| id.clone()),
                );
            }
        }
        let wanted: Vec<EntityId> = wanted.into_iter().collect();
        let popularity = self.store.entity_popularity(&wanted, measure)?;
        let corpus_size = self.store.corpus_size(measure)?;
        Ok(ScoringContext::new(
            entity_ids.to_vec(),
            popularity,
            corpus_size,
            self.scoring.clone(),
        ))
    }

    fn relatedness_table(
        &self,
        entity_ids: &[EntityId],
        authors: &[Author],
        cancel: &CancelToken,
    ) -> ExpertiseResult<RelatednessTable> {
        let pairs = relatedness_pairs(entity_ids, authors, self.scoring.min_author_entity_score);
        if pairs.is_empty() {
            return Ok(RelatednessTable::new());
        }
        let values = self.relatedness.relatedness_batch(&pairs, cancel)?;
        if values.len() != pairs.len() {
            return Err(ServiceError::InvalidResponse {
                service: "relatedness".to_string(),
                reason: format!("{} values for {} pairs", values.len(), pairs.len()),
            }
            .into());
        }
        debug!(pairs = pairs.len(), "relatedness fetched");
        Ok(pairs.into_iter().zip(values).collect())
    }

    /// Profile of one author, for display.
    pub fn author_profile(&self, author_id: &str) -> ExpertiseResult<AuthorProfile> {
        let author = self.require_author(author_id)?;
        Ok(build_profile(&author))
    }

    /// The author's documents mentioning any of `entity_ids` (all of them
    /// when `entity_ids` is empty).
    pub fn author_evidence(
        &self,
        author_id: &str,
        entity_ids: &[EntityId],
    ) -> ExpertiseResult<Vec<StoredDocument>> {
        self.require_author(author_id)?;
        self.store.author_documents_with_entities(author_id, entity_ids)
    }

    /// Authors whose name contains `fragment`.
    pub fn complete_author_names(&self, fragment: &str) -> ExpertiseResult<Vec<AuthorInfo>> {
        self.store.search_authors_by_name(fragment, MAX_NAME_COMPLETIONS)
    }

    fn require_author(&self, author_id: &str) -> ExpertiseResult<Author> {
        self.store
            .get_author(author_id)?
            .ok_or_else(|| ExpertiseError::AuthorNotFound {
                author_id: author_id.to_string(),
            })
    }
}

fn score_entity_signal(
    kind: ScoringKind,
    input: &EntityInput,
) -> ExpertiseResult<Vec<RankedAuthor>> {
    let mut ranking = score_authors(kind, &input.ctx, &input.authors)?;
    if !input.missing.is_empty() {
        ranking.extend(
            input
                .missing
                .iter()
                .map(|id| RankedAuthor::new(id.as_str(), id.as_str(), 0.0)),
        );
        sort_ranked(&mut ranking);
    }
    Ok(ranking)
}

/// Record a degraded component, unless the error is a cancellation.
fn absorb(
    degradations: &mut Vec<DegradationEvent>,
    component: &str,
    error: ExpertiseError,
) -> ExpertiseResult<()> {
    if matches!(error, ExpertiseError::Cancelled { .. }) {
        return Err(error);
    }
    let event = DegradationEvent::new(component, error.to_string());
    events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
    degradations.push(event);
    info!(component, "continuing with empty result");
    Ok(())
}
