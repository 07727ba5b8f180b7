//! v002: FTS5 index over document bodies, kept in sync by triggers.

use rusqlite::Connection;

use expertise_core::errors::ExpertiseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ExpertiseResult<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
            body,
            content = 'documents',
            content_rowid = 'document_id',
            tokenize = 'porter unicode61'
        );

        CREATE TRIGGER IF NOT EXISTS documents_fts_insert AFTER INSERT ON documents BEGIN
            INSERT INTO documents_fts(rowid, body) VALUES (new.document_id, new.body);
        END;

        CREATE TRIGGER IF NOT EXISTS documents_fts_delete AFTER DELETE ON documents BEGIN
            INSERT INTO documents_fts(documents_fts, rowid, body)
                VALUES ('delete', old.document_id, old.body);
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
