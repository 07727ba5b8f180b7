//! Author records: metadata, per-entity statistics, document membership.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::{Author, AuthorEntityStat, AuthorInfo};

use super::{from_json, to_json};
use crate::to_storage_err;

pub fn get_author(conn: &Connection, author_id: &str) -> ExpertiseResult<Option<Author>> {
    let info = conn
        .query_row(
            "SELECT name, institution FROM authors WHERE author_id = ?1",
            params![author_id],
            |row| {
                Ok(AuthorInfo::new(
                    author_id,
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let Some(info) = info else {
        return Ok(None);
    };

    let mut author = Author::new(&info);
    author.entities = load_entities(conn, author_id)?;
    author.document_ids = load_document_ids(conn, author_id)?;
    Ok(Some(author))
}

pub fn get_authors(conn: &Connection, author_ids: &[String]) -> ExpertiseResult<Vec<Author>> {
    let mut authors = Vec::with_capacity(author_ids.len());
    for author_id in author_ids {
        if let Some(author) = get_author(conn, author_id)? {
            authors.push(author);
        }
    }
    Ok(authors)
}

/// Insert or overwrite the author row and its entity statistics. Document
/// membership only grows.
pub fn upsert_author(conn: &Connection, author: &Author) -> ExpertiseResult<()> {
    conn.execute(
        "INSERT INTO authors (author_id, name, institution) VALUES (?1, ?2, ?3)
         ON CONFLICT(author_id) DO UPDATE SET name = excluded.name, institution = excluded.institution",
        params![author.author_id, author.name, author.institution],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entity_stmt = conn
        .prepare_cached(
            "INSERT INTO author_entities (author_id, entity_id, max_score, document_count, years)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(author_id, entity_id) DO UPDATE SET
                max_score = excluded.max_score,
                document_count = excluded.document_count,
                years = excluded.years",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (entity_id, stat) in &author.entities {
        entity_stmt
            .execute(params![
                author.author_id,
                entity_id,
                stat.max_score,
                stat.document_count,
                to_json(&stat.years)?,
            ])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    let mut doc_stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO author_documents (author_id, document_id) VALUES (?1, ?2)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    for document_id in &author.document_ids {
        doc_stmt
            .execute(params![author.author_id, document_id])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

pub fn author_document_count(conn: &Connection, author_id: &str) -> ExpertiseResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM author_documents WHERE author_id = ?1",
        params![author_id],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Authors whose name contains `fragment`, case-insensitively, by name.
pub fn search_authors_by_name(
    conn: &Connection,
    fragment: &str,
    limit: usize,
) -> ExpertiseResult<Vec<AuthorInfo>> {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{escaped}%");
    let mut stmt = conn
        .prepare(
            "SELECT author_id, name, institution FROM authors
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name, author_id
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![pattern, limit as i64], |row| {
            Ok(AuthorInfo::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn load_entities(
    conn: &Connection,
    author_id: &str,
) -> ExpertiseResult<BTreeMap<String, AuthorEntityStat>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, max_score, document_count, years
             FROM author_entities WHERE author_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![author_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entities = BTreeMap::new();
    for row in rows {
        let (entity_id, max_score, document_count, years) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let years = from_json(&years, &format!("author_entities/{author_id}/{entity_id}"))?;
        entities.insert(
            entity_id,
            AuthorEntityStat {
                max_score,
                document_count,
                years,
            },
        );
    }
    Ok(entities)
}

fn load_document_ids(conn: &Connection, author_id: &str) -> ExpertiseResult<Vec<i64>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT document_id FROM author_documents WHERE author_id = ?1 ORDER BY document_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![author_id], |row| row.get::<_, i64>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
