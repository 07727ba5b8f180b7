//! Corpus totals and whole-store maintenance.

use rusqlite::Connection;

use expertise_core::errors::ExpertiseResult;

use crate::to_storage_err;

fn count(conn: &Connection, table: &str) -> ExpertiseResult<u64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn total_documents(conn: &Connection) -> ExpertiseResult<u64> {
    count(conn, "documents")
}

pub fn total_authors(conn: &Connection) -> ExpertiseResult<u64> {
    count(conn, "authors")
}

pub fn total_entities(conn: &Connection) -> ExpertiseResult<u64> {
    count(conn, "entities")
}

/// Document count of every author, ascending. Authors without documents count as 0.
pub fn author_document_counts(conn: &Connection) -> ExpertiseResult<Vec<u64>> {
    let mut stmt = conn
        .prepare(
            "SELECT COUNT(ad.document_id) AS n FROM authors a
             LEFT JOIN author_documents ad ON ad.author_id = a.author_id
             GROUP BY a.author_id
             ORDER BY n",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, i64>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.map(|row| row.map(|n| n as u64))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete every record. Document ids keep increasing across an erase.
pub fn erase(conn: &Connection) -> ExpertiseResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("erase begin: {e}")))?;
    let result = tx
        .execute_batch(
            "
            DELETE FROM entity_occurrences;
            DELETE FROM entity_documents;
            DELETE FROM entities;
            DELETE FROM author_documents;
            DELETE FROM author_entities;
            DELETE FROM authors;
            DELETE FROM document_entities;
            DELETE FROM documents;
            ",
        )
        .map_err(|e| to_storage_err(e.to_string()));
    match result {
        Ok(()) => tx
            .commit()
            .map_err(|e| to_storage_err(format!("erase commit: {e}"))),
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}
