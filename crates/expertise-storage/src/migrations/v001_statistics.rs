//! v001: authors, author entity statistics, documents, entity popularity,
//! and the (entity, max_score) inverted index.

use rusqlite::Connection;

use expertise_core::errors::ExpertiseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ExpertiseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS authors (
            author_id   TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            institution TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_authors_name ON authors(name);

        CREATE TABLE IF NOT EXISTS author_entities (
            author_id      TEXT NOT NULL REFERENCES authors(author_id) ON DELETE CASCADE,
            entity_id      TEXT NOT NULL,
            max_score      REAL NOT NULL,
            document_count INTEGER NOT NULL,
            years          TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (author_id, entity_id)
        );

        CREATE TABLE IF NOT EXISTS documents (
            document_id INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id   TEXT NOT NULL,
            year        INTEGER NOT NULL,
            body        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_author ON documents(author_id);

        CREATE TABLE IF NOT EXISTS document_entities (
            document_id  INTEGER NOT NULL REFERENCES documents(document_id) ON DELETE CASCADE,
            entity_id    TEXT NOT NULL,
            entity_title TEXT NOT NULL,
            count        INTEGER NOT NULL,
            max_score    REAL NOT NULL,
            PRIMARY KEY (document_id, entity_id)
        );
        CREATE INDEX IF NOT EXISTS idx_document_entities_entity ON document_entities(entity_id);

        CREATE TABLE IF NOT EXISTS author_documents (
            author_id   TEXT NOT NULL REFERENCES authors(author_id) ON DELETE CASCADE,
            document_id INTEGER NOT NULL,
            PRIMARY KEY (author_id, document_id)
        );

        CREATE TABLE IF NOT EXISTS entities (
            entity_id    TEXT PRIMARY KEY,
            entity_name  TEXT NOT NULL,
            institutions TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS entity_documents (
            entity_id   TEXT NOT NULL REFERENCES entities(entity_id) ON DELETE CASCADE,
            document_id INTEGER NOT NULL,
            PRIMARY KEY (entity_id, document_id)
        );

        CREATE TABLE IF NOT EXISTS entity_occurrences (
            entity_id TEXT NOT NULL REFERENCES entities(entity_id) ON DELETE CASCADE,
            author_id TEXT NOT NULL,
            count     INTEGER NOT NULL,
            max_score REAL NOT NULL,
            years     TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (entity_id, author_id)
        );
        CREATE INDEX IF NOT EXISTS idx_occurrences_entity_score
            ON entity_occurrences(entity_id, max_score);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
