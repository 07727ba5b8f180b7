//! Immutable documents and their per-document entity summaries.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::{DocumentEntity, NewDocument, StoredDocument};

use super::placeholders;
use crate::to_storage_err;

/// Insert the document and its entity summary atomically; returns the new id.
pub fn insert_document(conn: &Connection, document: &NewDocument) -> ExpertiseResult<i64> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_document begin: {e}")))?;

    match insert_document_rows(&tx, document) {
        Ok(document_id) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_document commit: {e}")))?;
            Ok(document_id)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Row inserts only; the caller owns the transaction.
pub fn insert_document_rows(conn: &Connection, document: &NewDocument) -> ExpertiseResult<i64> {
    conn.execute(
        "INSERT INTO documents (author_id, year, body) VALUES (?1, ?2, ?3)",
        params![document.author_id, document.year, document.body],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let document_id = conn.last_insert_rowid();

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO document_entities (document_id, entity_id, entity_title, count, max_score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for entity in &document.entities {
        stmt.execute(params![
            document_id,
            entity.entity_id,
            entity.entity_title,
            entity.count,
            entity.max_score,
        ])
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(document_id)
}

pub fn get_document(
    conn: &Connection,
    document_id: i64,
) -> ExpertiseResult<Option<StoredDocument>> {
    let row = conn
        .query_row(
            "SELECT author_id, year, body FROM documents WHERE document_id = ?1",
            params![document_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let Some((author_id, year, body)) = row else {
        return Ok(None);
    };

    Ok(Some(StoredDocument {
        document_id,
        author_id,
        year,
        body,
        entities: load_document_entities(conn, document_id)?,
    }))
}

/// The author's documents mentioning any of `entity_ids`, by id. An empty
/// entity list selects all of the author's documents.
pub fn author_documents_with_entities(
    conn: &Connection,
    author_id: &str,
    entity_ids: &[String],
) -> ExpertiseResult<Vec<StoredDocument>> {
    let ids: Vec<i64> = if entity_ids.is_empty() {
        let mut stmt = conn
            .prepare("SELECT document_id FROM documents WHERE author_id = ?1 ORDER BY document_id")
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params![author_id], |row| row.get::<_, i64>(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| to_storage_err(e.to_string()))?
    } else {
        let sql = format!(
            "SELECT DISTINCT d.document_id FROM documents d
             JOIN document_entities de ON de.document_id = d.document_id
             WHERE d.author_id = ?1 AND de.entity_id IN ({})
             ORDER BY d.document_id",
            placeholders(2, entity_ids.len())
        );
        let values = std::iter::once(author_id).chain(entity_ids.iter().map(String::as_str));
        let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| row.get::<_, i64>(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| to_storage_err(e.to_string()))?
    };

    let mut documents = Vec::with_capacity(ids.len());
    for document_id in ids {
        if let Some(document) = get_document(conn, document_id)? {
            documents.push(document);
        }
    }
    Ok(documents)
}

fn load_document_entities(
    conn: &Connection,
    document_id: i64,
) -> ExpertiseResult<Vec<DocumentEntity>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, entity_title, count, max_score
             FROM document_entities WHERE document_id = ?1
             ORDER BY entity_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![document_id], |row| {
            Ok(DocumentEntity {
                entity_id: row.get(0)?,
                entity_title: row.get(1)?,
                count: row.get(2)?,
                max_score: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
