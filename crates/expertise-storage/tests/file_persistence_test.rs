//! File-backed stores: reopen survival, WAL mode, read pool visibility.

use std::sync::Arc;

use expertise_core::models::{Author, AuthorEntityStat, AuthorInfo, NewDocument};
use expertise_core::traits::{IFullTextSearch, IStatisticsStore};
use expertise_storage::migrations::LATEST_VERSION;
use expertise_storage::pool::pragmas::verify_wal_mode;
use expertise_storage::StorageEngine;

fn sample_author(id: &str) -> Author {
    let mut author = Author::new(&AuthorInfo::new(id, format!("Name {id}"), "Uni"));
    author
        .entities
        .insert("X".into(), AuthorEntityStat::new(0.7, 2015));
    author
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.db");
    {
        let store = StorageEngine::open(&path).unwrap();
        store.upsert_author(&sample_author("a1")).unwrap();
        store
            .insert_document(&NewDocument {
                author_id: "a1".into(),
                year: 2015,
                body: "persistent statistics survive restarts".into(),
                entities: vec![],
            })
            .unwrap();
    }
    let store = StorageEngine::open(&path).unwrap();
    assert_eq!(store.get_author("a1").unwrap().unwrap(), sample_author("a1"));
    assert_eq!(store.search("restarts", 5).unwrap().len(), 1);
    assert_eq!(store.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn file_store_uses_wal_and_read_pool() {
    let dir = tempfile::tempdir().unwrap();
    let store = StorageEngine::open(&dir.path().join("wal.db")).unwrap();
    let wal = store
        .pool()
        .writer
        .with_conn_sync(verify_wal_mode)
        .unwrap();
    assert!(wal);
    assert_eq!(store.pool().readers.as_ref().map(|r| r.size()), Some(4));
}

#[test]
fn concurrent_reads_during_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StorageEngine::open(&dir.path().join("concurrent.db")).unwrap());
    for i in 0..10 {
        store.upsert_author(&sample_author(&format!("init-{i}"))).unwrap();
    }

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..10 {
                    let found = store.get_author(&format!("init-{i}")).unwrap();
                    assert!(found.is_some());
                    store.citing_authors(&["X".into()], 0.2).unwrap();
                }
            })
        })
        .collect();

    let writer_store = Arc::clone(&store);
    let writer = std::thread::spawn(move || {
        for i in 0..10 {
            writer_store.upsert_author(&sample_author(&format!("write-{i}"))).unwrap();
        }
    });

    writer.join().expect("writer should not panic");
    for reader in readers {
        reader.join().expect("reader should not panic");
    }
    assert_eq!(store.total_authors().unwrap(), 20);
}
