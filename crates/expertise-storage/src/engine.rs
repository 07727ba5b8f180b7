//! StorageEngine: owns the connection pool, runs migrations at startup and
//! implements `IStatisticsStore` and `IFullTextSearch`.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use expertise_core::config::StorageConfig;
use expertise_core::errors::ExpertiseResult;
use expertise_core::models::{
    Author, AuthorInfo, EntityPopularity, NewDocument, PopularityMeasure, StoredDocument, TermHit,
};
use expertise_core::traits::{IFullTextSearch, IStatisticsStore};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{aggregate_ops, author_ops, document_ops, entity_ops, term_search};
use crate::to_storage_err;

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a file-backed store with default pool settings.
    pub fn open(path: &Path) -> ExpertiseResult<Self> {
        Self::open_with_config(&StorageConfig {
            db_path: path.display().to_string(),
            ..StorageConfig::default()
        })
    }

    pub fn open_with_config(config: &StorageConfig) -> ExpertiseResult<Self> {
        let path = Path::new(&config.db_path);
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let version = pool.writer.with_conn_sync(migrations::run_migrations)?;
        info!(path = %config.db_path, schema_version = version, "statistics store opened");
        Ok(Self { pool })
    }

    /// In-memory store; every read goes through the writer.
    pub fn open_in_memory() -> ExpertiseResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.writer.with_conn_sync(migrations::run_migrations)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> ExpertiseResult<u32> {
        self.pool.writer.with_conn_sync(migrations::current_version)
    }

    /// File-backed stores read from the pool; in-memory stores only have the writer.
    fn with_reader<F, T>(&self, f: F) -> ExpertiseResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ExpertiseResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }

    fn with_writer<F, T>(&self, f: F) -> ExpertiseResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ExpertiseResult<T>,
    {
        self.pool.writer.with_conn_sync(f)
    }
}

impl IStatisticsStore for StorageEngine {
    fn get_author(&self, author_id: &str) -> ExpertiseResult<Option<Author>> {
        self.with_reader(|conn| author_ops::get_author(conn, author_id))
    }

    fn get_authors(&self, author_ids: &[String]) -> ExpertiseResult<Vec<Author>> {
        self.with_reader(|conn| author_ops::get_authors(conn, author_ids))
    }

    fn upsert_author(&self, author: &Author) -> ExpertiseResult<()> {
        self.with_writer(|conn| author_ops::upsert_author(conn, author))
    }

    fn get_entity(&self, entity_id: &str) -> ExpertiseResult<Option<EntityPopularity>> {
        self.with_reader(|conn| entity_ops::get_entity(conn, entity_id))
    }

    fn upsert_entity(&self, entity: &EntityPopularity) -> ExpertiseResult<()> {
        self.with_writer(|conn| entity_ops::upsert_entity(conn, entity))
    }

    fn save_document_aggregates(
        &self,
        document: &NewDocument,
        author: &Author,
        entities: &[EntityPopularity],
    ) -> ExpertiseResult<i64> {
        self.with_writer(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("save_document_aggregates begin: {e}")))?;
            let written = document_ops::insert_document_rows(&tx, document).and_then(|id| {
                let mut author = author.clone();
                author.document_ids.push(id);
                author_ops::upsert_author(&tx, &author)?;
                for entity in entities {
                    let mut entity = entity.clone();
                    entity.documents.push(id);
                    entity_ops::upsert_entity(&tx, &entity)?;
                }
                Ok(id)
            });
            match written {
                Ok(document_id) => {
                    tx.commit().map_err(|e| {
                        to_storage_err(format!("save_document_aggregates commit: {e}"))
                    })?;
                    debug!(
                        author_id = %author.author_id,
                        document_id,
                        entities = entities.len(),
                        "document and aggregates saved"
                    );
                    Ok(document_id)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })
    }

    fn insert_document(&self, document: &NewDocument) -> ExpertiseResult<i64> {
        self.with_writer(|conn| document_ops::insert_document(conn, document))
    }

    fn get_document(&self, document_id: i64) -> ExpertiseResult<Option<StoredDocument>> {
        self.with_reader(|conn| document_ops::get_document(conn, document_id))
    }

    fn author_documents_with_entities(
        &self,
        author_id: &str,
        entity_ids: &[String],
    ) -> ExpertiseResult<Vec<StoredDocument>> {
        self.with_reader(|conn| {
            document_ops::author_documents_with_entities(conn, author_id, entity_ids)
        })
    }

    fn entity_popularity(
        &self,
        entity_ids: &[String],
        measure: PopularityMeasure,
    ) -> ExpertiseResult<HashMap<String, u64>> {
        self.with_reader(|conn| entity_ops::entity_popularity(conn, entity_ids, measure))
    }

    fn citing_authors(
        &self,
        entity_ids: &[String],
        min_score: f64,
    ) -> ExpertiseResult<Vec<String>> {
        self.with_reader(|conn| entity_ops::citing_authors(conn, entity_ids, min_score))
    }

    fn search_authors_by_name(
        &self,
        fragment: &str,
        limit: usize,
    ) -> ExpertiseResult<Vec<AuthorInfo>> {
        self.with_reader(|conn| author_ops::search_authors_by_name(conn, fragment, limit))
    }

    fn total_documents(&self) -> ExpertiseResult<u64> {
        self.with_reader(aggregate_ops::total_documents)
    }

    fn total_authors(&self) -> ExpertiseResult<u64> {
        self.with_reader(aggregate_ops::total_authors)
    }

    fn total_entities(&self) -> ExpertiseResult<u64> {
        self.with_reader(aggregate_ops::total_entities)
    }

    fn author_document_count(&self, author_id: &str) -> ExpertiseResult<u64> {
        self.with_reader(|conn| author_ops::author_document_count(conn, author_id))
    }

    fn author_document_counts(&self) -> ExpertiseResult<Vec<u64>> {
        self.with_reader(aggregate_ops::author_document_counts)
    }

    fn erase(&self) -> ExpertiseResult<()> {
        self.with_writer(aggregate_ops::erase)?;
        info!("statistics store erased");
        Ok(())
    }
}

impl IFullTextSearch for StorageEngine {
    fn search(&self, query: &str, top_k: usize) -> ExpertiseResult<Vec<TermHit>> {
        self.with_reader(|conn| term_search::search(conn, query, top_k))
    }
}
