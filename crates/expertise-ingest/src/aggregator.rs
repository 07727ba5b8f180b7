//! Single-document aggregation into author and entity popularity records.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use expertise_core::config::IngestionConfig;
use expertise_core::errors::{ExpertiseResult, IngestionError};
use expertise_core::models::{
    Annotation, Author, AuthorEntityStat, AuthorInfo, AuthorOccurrence, DocumentEntity,
    DocumentId, DocumentInput, EntityPopularity, NewDocument,
};
use expertise_core::traits::IStatisticsStore;
use expertise_observability::ingest_span;

use crate::locks::{self, KeyLocks};

/// Why a document was left out without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    EmptyBody,
    TooShort { length: usize, min_length: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "empty body"),
            Self::TooShort { length, min_length } => {
                write!(f, "body has {length} characters, needs more than {min_length}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum IngestOutcome {
    Indexed { document_id: DocumentId },
    Skipped { reason: SkipReason },
}

/// Collapse annotations into one [`DocumentEntity`] per entity, ordered by
/// entity id. Annotations below `min_score` are dropped first.
pub fn summarize_annotations(annotations: &[Annotation], min_score: f64) -> Vec<DocumentEntity> {
    let mut by_entity: BTreeMap<&str, DocumentEntity> = BTreeMap::new();
    for annotation in annotations.iter().filter(|a| a.score >= min_score) {
        by_entity
            .entry(annotation.entity_id.as_str())
            .and_modify(|entity| {
                entity.count += 1;
                entity.max_score = entity.max_score.max(annotation.score);
            })
            .or_insert_with(|| DocumentEntity {
                entity_id: annotation.entity_id.clone(),
                entity_title: annotation.entity_title.clone(),
                count: 1,
                max_score: annotation.score,
            });
    }
    by_entity.into_values().collect()
}

/// Maintains author statistics and entity popularity as documents arrive.
///
/// Not idempotent: ingesting the same document twice counts it twice.
/// Read-modify-write of each author and entity record is serialized by
/// per-key locks, so concurrent `ingest` calls never lose increments.
pub struct Aggregator {
    store: Arc<dyn IStatisticsStore>,
    config: IngestionConfig,
    author_locks: KeyLocks,
    entity_locks: KeyLocks,
}

impl Aggregator {
    pub fn new(store: Arc<dyn IStatisticsStore>, config: IngestionConfig) -> Self {
        Self {
            store,
            config,
            author_locks: KeyLocks::new(),
            entity_locks: KeyLocks::new(),
        }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn IStatisticsStore> {
        &self.store
    }

    /// `Some` if `body` is too short to be worth annotating.
    pub fn skip_reason(&self, body: &str) -> Option<SkipReason> {
        let length = body.trim().chars().count();
        if length == 0 {
            Some(SkipReason::EmptyBody)
        } else if length <= self.config.min_document_length {
            Some(SkipReason::TooShort {
                length,
                min_length: self.config.min_document_length,
            })
        } else {
            None
        }
    }

    /// Check author metadata and that the document belongs to that author.
    pub fn validate(author: &AuthorInfo, document: &DocumentInput) -> Result<(), IngestionError> {
        author.validate()?;
        if document.author_id != author.author_id {
            return Err(IngestionError::AuthorMismatch {
                author_id: author.author_id.clone(),
                document_author: document.author_id.clone(),
            });
        }
        Ok(())
    }

    /// Ingest one document with its annotations.
    ///
    /// Invalid author metadata is an error; a short body is a skip.
    pub fn ingest(
        &self,
        author: &AuthorInfo,
        document: &DocumentInput,
        annotations: &[Annotation],
    ) -> ExpertiseResult<IngestOutcome> {
        let _span = ingest_span!(author.author_id, document.year).entered();

        Self::validate(author, document)?;
        if let Some(reason) = self.skip_reason(&document.body) {
            debug!(author_id = %author.author_id, %reason, "document skipped");
            return Ok(IngestOutcome::Skipped { reason });
        }

        let entities = summarize_annotations(annotations, self.config.min_annotation_score);

        let author_lock = self.author_locks.handle(&author.author_id);
        let _author_guard = locks::acquire(&author_lock)?;
        let entity_handles = self
            .entity_locks
            .sorted_handles(entities.iter().map(|e| e.entity_id.as_str()));
        let _entity_guards = locks::acquire_all(&entity_handles)?;

        let mut record = self
            .store
            .get_author(&author.author_id)?
            .unwrap_or_else(|| Author::new(author));
        for entity in &entities {
            update_author_stat(&mut record, entity, document.year);
        }

        let mut popularity = Vec::with_capacity(entities.len());
        for entity in &entities {
            let existing = self.store.get_entity(&entity.entity_id)?;
            popularity.push(update_popularity(existing, entity, author, document.year));
        }

        // The store assigns the id and appends it to the author and entity records.
        let document_id = self.store.save_document_aggregates(
            &NewDocument {
                author_id: author.author_id.clone(),
                year: document.year,
                body: document.body.clone(),
                entities,
            },
            &record,
            &popularity,
        )?;

        debug!(
            author_id = %author.author_id,
            document_id,
            entities = popularity.len(),
            "document indexed"
        );
        Ok(IngestOutcome::Indexed { document_id })
    }
}

fn update_author_stat(author: &mut Author, entity: &DocumentEntity, year: i32) {
    author
        .entities
        .entry(entity.entity_id.clone())
        .and_modify(|stat| {
            stat.max_score = stat.max_score.max(entity.max_score);
            stat.document_count += 1;
            stat.years.push(year);
        })
        .or_insert_with(|| AuthorEntityStat::new(entity.max_score, year));
}

fn update_popularity(
    existing: Option<EntityPopularity>,
    entity: &DocumentEntity,
    author: &AuthorInfo,
    year: i32,
) -> EntityPopularity {
    let is_new_record = existing.is_none();
    let mut record = existing
        .unwrap_or_else(|| EntityPopularity::new(&entity.entity_id, &entity.entity_title));

    record.institutions.insert(author.institution.clone());

    match record.occurrences.get_mut(&author.author_id) {
        Some(occurrence) => {
            occurrence.count += entity.count;
            occurrence.max_score = occurrence.max_score.max(entity.max_score);
            occurrence.years.insert(year);
        }
        None => {
            // A first record starts from the document's mention count; a later
            // author joining an existing record starts at one.
            let count = if is_new_record { entity.count } else { 1 };
            record.occurrences.insert(
                author.author_id.clone(),
                AuthorOccurrence {
                    count,
                    max_score: entity.max_score,
                    years: [year].into_iter().collect(),
                },
            );
        }
    }
    record
}
