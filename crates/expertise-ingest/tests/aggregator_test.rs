use std::sync::Arc;

use expertise_core::config::IngestionConfig;
use expertise_core::errors::{ExpertiseError, IngestionError, StorageError};
use expertise_core::models::{Annotation, AuthorInfo, DocumentInput, PopularityMeasure};
use expertise_core::traits::IStatisticsStore;
use expertise_ingest::{Aggregator, IngestOutcome, SkipReason};
use expertise_storage::StorageEngine;

fn setup() -> (Arc<StorageEngine>, Aggregator) {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let aggregator = Aggregator::new(store.clone(), IngestionConfig::default());
    (store, aggregator)
}

fn info(id: &str) -> AuthorInfo {
    AuthorInfo::new(id, format!("Name of {id}"), format!("Institution of {id}"))
}

fn doc(author_id: &str, year: i32) -> DocumentInput {
    DocumentInput {
        author_id: author_id.to_string(),
        year,
        body: "A document body long enough to be indexed.".to_string(),
    }
}

fn ann(entity: &str, score: f64) -> Annotation {
    Annotation {
        entity_id: entity.to_string(),
        entity_title: entity.to_string(),
        score,
        span: (0, 1),
    }
}

fn indexed(outcome: IngestOutcome) -> i64 {
    match outcome {
        IngestOutcome::Indexed { document_id } => document_id,
        other => panic!("expected indexed, got {other:?}"),
    }
}

#[test]
fn two_author_corpus_scenario() {
    let (store, aggregator) = setup();
    aggregator
        .ingest(&info("A1"), &doc("A1", 2010), &[ann("X", 0.8), ann("Y", 0.6)])
        .unwrap();
    aggregator.ingest(&info("A1"), &doc("A1", 2011), &[ann("X", 0.5)]).unwrap();
    aggregator.ingest(&info("A2"), &doc("A2", 2012), &[ann("Y", 0.7)]).unwrap();

    assert_eq!(store.citing_authors(&["X".into()], 0.2).unwrap(), vec!["A1"]);
    assert_eq!(store.citing_authors(&["Y".into()], 0.2).unwrap(), vec!["A1", "A2"]);

    let a1 = store.get_author("A1").unwrap().unwrap();
    assert_eq!(a1.document_count(), 2);
    assert_eq!(a1.entities["X"].document_count, 2);
    assert_eq!(a1.entities["X"].max_score, 0.8);
    assert_eq!(a1.entities["X"].years, vec![2010, 2011]);
    assert_eq!(a1.entities["Y"].document_count, 1);

    let documents = store
        .entity_popularity(&["X".into(), "Y".into()], PopularityMeasure::Documents)
        .unwrap();
    assert_eq!(documents["X"], 2);
    assert_eq!(documents["Y"], 2);
    let authors = store
        .entity_popularity(&["X".into(), "Y".into()], PopularityMeasure::Authors)
        .unwrap();
    assert_eq!(authors["X"], 1);
    assert_eq!(authors["Y"], 2);

    assert_eq!(store.total_documents().unwrap(), 3);
    assert_eq!(store.total_authors().unwrap(), 2);
}

#[test]
fn reingesting_doubles_contribution() {
    let (store, aggregator) = setup();
    let annotations = [ann("X", 0.9), ann("X", 0.4), ann("Y", 0.5)];
    let first = indexed(aggregator.ingest(&info("A1"), &doc("A1", 2015), &annotations).unwrap());
    let second = indexed(aggregator.ingest(&info("A1"), &doc("A1", 2015), &annotations).unwrap());
    assert!(second > first);

    let author = store.get_author("A1").unwrap().unwrap();
    assert_eq!(author.entities["X"].document_count, 2);
    assert_eq!(author.entities["Y"].document_count, 2);
    assert_eq!(author.entities["X"].years, vec![2015, 2015]);
    assert_eq!(author.document_ids, vec![first, second]);

    let x = store.get_entity("X").unwrap().unwrap();
    assert_eq!(x.documents, vec![first, second]);
    // Seeded with two mentions, then two more from the same author.
    assert_eq!(x.occurrences["A1"].count, 4);
    assert_eq!(x.occurrences["A1"].years.len(), 1);
}

#[test]
fn short_document_is_skipped_silently() {
    let (store, aggregator) = setup();
    let short = DocumentInput {
        body: "too short".to_string(),
        ..doc("A1", 2010)
    };
    let outcome = aggregator.ingest(&info("A1"), &short, &[ann("X", 0.9)]).unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Skipped {
            reason: SkipReason::TooShort {
                length: 9,
                min_length: 10
            }
        }
    );
    let empty = DocumentInput {
        body: "   ".to_string(),
        ..doc("A1", 2010)
    };
    assert_eq!(
        aggregator.ingest(&info("A1"), &empty, &[]).unwrap(),
        IngestOutcome::Skipped {
            reason: SkipReason::EmptyBody
        }
    );
    assert_eq!(store.total_documents().unwrap(), 0);
    assert!(store.get_author("A1").unwrap().is_none());
}

#[test]
fn missing_metadata_is_fatal_and_writes_nothing() {
    let (store, aggregator) = setup();
    let nameless = AuthorInfo::new("A1", "", "Uni");
    let err = aggregator
        .ingest(&nameless, &doc("A1", 2010), &[ann("X", 0.9)])
        .unwrap_err();
    assert!(matches!(
        err,
        ExpertiseError::IngestionError(IngestionError::MissingAuthorField { ref field }) if field == "name"
    ));
    assert_eq!(store.total_documents().unwrap(), 0);
}

#[test]
fn document_of_another_author_is_rejected() {
    let (_store, aggregator) = setup();
    let err = aggregator
        .ingest(&info("A1"), &doc("A2", 2010), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ExpertiseError::IngestionError(IngestionError::AuthorMismatch { .. })
    ));
}

#[test]
fn failed_write_leaves_corpus_unchanged() {
    let (store, aggregator) = setup();
    aggregator.ingest(&info("A1"), &doc("A1", 2010), &[ann("X", 0.9)]).unwrap();
    store
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON entities
                 WHEN NEW.entity_id = 'Bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .map_err(|e| StorageError::SqliteError { message: e.to_string() }.into())
        })
        .unwrap();

    let err = aggregator
        .ingest(&info("A1"), &doc("A1", 2011), &[ann("X", 0.8), ann("Bad", 0.9)])
        .unwrap_err();
    assert!(matches!(err, ExpertiseError::StorageError(_)));

    assert_eq!(store.total_documents().unwrap(), 1);
    let author = store.get_author("A1").unwrap().unwrap();
    assert_eq!(author.document_count(), 1);
    assert_eq!(author.entities["X"].document_count, 1);
    assert_eq!(store.get_entity("X").unwrap().unwrap().documents.len(), 1);

    aggregator.ingest(&info("A1"), &doc("A1", 2012), &[ann("X", 0.7)]).unwrap();
    assert_eq!(store.total_documents().unwrap(), 2);
    assert_eq!(store.author_document_count("A1").unwrap(), 2);
}

#[test]
fn max_score_never_decreases() {
    let (store, aggregator) = setup();
    aggregator.ingest(&info("A1"), &doc("A1", 2010), &[ann("X", 0.9)]).unwrap();
    aggregator.ingest(&info("A1"), &doc("A1", 2011), &[ann("X", 0.3)]).unwrap();
    let author = store.get_author("A1").unwrap().unwrap();
    assert_eq!(author.entities["X"].max_score, 0.9);
    let entity = store.get_entity("X").unwrap().unwrap();
    assert_eq!(entity.occurrences["A1"].max_score, 0.9);
}

#[test]
fn low_confidence_annotations_are_dropped() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let config = IngestionConfig {
        min_annotation_score: 0.1,
        ..IngestionConfig::default()
    };
    let aggregator = Aggregator::new(store.clone(), config);
    aggregator
        .ingest(&info("A1"), &doc("A1", 2010), &[ann("X", 0.05), ann("Y", 0.2)])
        .unwrap();
    let author = store.get_author("A1").unwrap().unwrap();
    assert!(!author.entities.contains_key("X"));
    assert!(store.get_entity("X").unwrap().is_none());
    // The document itself is still indexed.
    assert_eq!(author.document_count(), 1);
}

#[test]
fn document_without_entities_counts_for_author() {
    let (store, aggregator) = setup();
    aggregator.ingest(&info("A1"), &doc("A1", 2010), &[]).unwrap();
    assert_eq!(store.author_document_count("A1").unwrap(), 1);
    assert_eq!(store.total_entities().unwrap(), 0);
}

#[test]
fn concurrent_ingestion_loses_no_increments() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StorageEngine::open(&dir.path().join("stats.db")).unwrap());
    let aggregator = Arc::new(Aggregator::new(store.clone(), IngestionConfig::default()));

    let threads: Vec<_> = (0..8)
        .map(|t| {
            let aggregator = Arc::clone(&aggregator);
            std::thread::spawn(move || {
                // Half the threads share an author, all share an entity.
                let author_id = if t % 2 == 0 { "shared-author".to_string() } else { format!("A{t}") };
                for i in 0..10 {
                    aggregator
                        .ingest(
                            &info(&author_id),
                            &doc(&author_id, 2000 + i),
                            &[ann("Shared", 0.5), ann(&format!("Own{t}"), 0.5)],
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let shared_author = store.get_author("shared-author").unwrap().unwrap();
    assert_eq!(shared_author.document_count(), 40);
    assert_eq!(shared_author.entities["Shared"].document_count, 40);

    let shared = store.get_entity("Shared").unwrap().unwrap();
    assert_eq!(shared.documents.len(), 80);
    assert_eq!(shared.occurrences["shared-author"].count, 40);
    assert_eq!(shared.occurrences.len(), 5);
    assert_eq!(store.total_documents().unwrap(), 80);
}
