use expertise_core::models::{Author, AuthorInfo, NewDocument};
use expertise_core::traits::{IFullTextSearch, IStatisticsStore};
use expertise_storage::StorageEngine;

fn add(store: &StorageEngine, author_id: &str, body: &str) -> i64 {
    store
        .insert_document(&NewDocument {
            author_id: author_id.to_string(),
            year: 2012,
            body: body.to_string(),
            entities: vec![],
        })
        .unwrap()
}

#[test]
fn search_ranks_matching_documents() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .upsert_author(&Author::new(&AuthorInfo::new("a1", "Ada", "Uni")))
        .unwrap();
    let relevant = add(&store, "a1", "entity linking for entity search in graphs");
    add(&store, "a2", "a study of coffee consumption among students");

    let hits = store.search("entity linking", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_id, relevant);
    assert_eq!(hits[0].author_name, "Ada");
    assert!(hits[0].score > 0.0);
}

#[test]
fn search_falls_back_to_author_id_without_author_record() {
    let store = StorageEngine::open_in_memory().unwrap();
    add(&store, "orphan", "query expansion with knowledge bases");
    let hits = store.search("expansion", 5).unwrap();
    assert_eq!(hits[0].author_name, "orphan");
}

#[test]
fn search_respects_top_k_and_order() {
    let store = StorageEngine::open_in_memory().unwrap();
    for i in 0..5 {
        add(&store, &format!("a{i}"), &"ranking ".repeat(i + 1));
    }
    let hits = store.search("ranking", 3).unwrap();
    assert_eq!(hits.len(), 3);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn search_tolerates_fts_syntax_in_user_text() {
    let store = StorageEngine::open_in_memory().unwrap();
    add(&store, "a1", "neural retrieval models");
    let hits = store.search("neural AND (\"retrieval\" NEAR*", 5).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(store.search("()", 5).unwrap().is_empty());
}
