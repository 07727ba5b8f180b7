//! Entity popularity records and the entity → author inverted index.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::{AuthorOccurrence, EntityPopularity, PopularityMeasure};

use super::{from_json, placeholders, to_json};
use crate::to_storage_err;

pub fn get_entity(conn: &Connection, entity_id: &str) -> ExpertiseResult<Option<EntityPopularity>> {
    let row = conn
        .query_row(
            "SELECT entity_name, institutions FROM entities WHERE entity_id = ?1",
            params![entity_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let Some((entity_name, institutions)) = row else {
        return Ok(None);
    };

    let mut entity = EntityPopularity::new(entity_id, entity_name);
    entity.institutions =
        from_json::<BTreeSet<String>>(&institutions, &format!("entities/{entity_id}"))?;
    entity.occurrences = load_occurrences(conn, entity_id)?;
    entity.documents = load_documents(conn, entity_id)?;
    Ok(Some(entity))
}

/// Insert or overwrite the entity row and its per-author occurrences.
/// Document membership only grows.
pub fn upsert_entity(conn: &Connection, entity: &EntityPopularity) -> ExpertiseResult<()> {
    conn.execute(
        "INSERT INTO entities (entity_id, entity_name, institutions) VALUES (?1, ?2, ?3)
         ON CONFLICT(entity_id) DO UPDATE SET
            entity_name = excluded.entity_name,
            institutions = excluded.institutions",
        params![entity.entity_id, entity.entity_name, to_json(&entity.institutions)?],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut occurrence_stmt = conn
        .prepare_cached(
            "INSERT INTO entity_occurrences (entity_id, author_id, count, max_score, years)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entity_id, author_id) DO UPDATE SET
                count = excluded.count,
                max_score = excluded.max_score,
                years = excluded.years",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (author_id, occurrence) in &entity.occurrences {
        occurrence_stmt
            .execute(params![
                entity.entity_id,
                author_id,
                occurrence.count,
                occurrence.max_score,
                to_json(&occurrence.years)?,
            ])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    let mut doc_stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO entity_documents (entity_id, document_id) VALUES (?1, ?2)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    for document_id in &entity.documents {
        doc_stmt
            .execute(params![entity.entity_id, document_id])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Popularity of each known entity under `measure`.
pub fn entity_popularity(
    conn: &Connection,
    entity_ids: &[String],
    measure: PopularityMeasure,
) -> ExpertiseResult<HashMap<String, u64>> {
    if entity_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let table = match measure {
        PopularityMeasure::Documents => "entity_documents",
        PopularityMeasure::Authors => "entity_occurrences",
    };
    let sql = format!(
        "SELECT entity_id, COUNT(*) FROM {table}
         WHERE entity_id IN ({})
         GROUP BY entity_id",
        placeholders(1, entity_ids.len())
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(entity_ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Distinct authors citing any of `entity_ids` with `max_score >= min_score`.
/// Served by `idx_occurrences_entity_score`, so the cost follows the number
/// of matching occurrences rather than the corpus size.
pub fn citing_authors(
    conn: &Connection,
    entity_ids: &[String],
    min_score: f64,
) -> ExpertiseResult<Vec<String>> {
    if entity_ids.is_empty() {
        return Ok(Vec::new());
    }
    let score_param = entity_ids.len() + 1;
    let sql = format!(
        "SELECT DISTINCT author_id FROM entity_occurrences
         WHERE entity_id IN ({}) AND max_score >= ?{score_param}
         ORDER BY author_id",
        placeholders(1, entity_ids.len())
    );
    let mut values: Vec<rusqlite::types::Value> = entity_ids
        .iter()
        .map(|id| rusqlite::types::Value::Text(id.clone()))
        .collect();
    values.push(rusqlite::types::Value::Real(min_score));

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn load_occurrences(
    conn: &Connection,
    entity_id: &str,
) -> ExpertiseResult<BTreeMap<String, AuthorOccurrence>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT author_id, count, max_score, years FROM entity_occurrences WHERE entity_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![entity_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut occurrences = BTreeMap::new();
    for row in rows {
        let (author_id, count, max_score, years) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let years = from_json(&years, &format!("entity_occurrences/{entity_id}/{author_id}"))?;
        occurrences.insert(
            author_id,
            AuthorOccurrence {
                count,
                max_score,
                years,
            },
        );
    }
    Ok(occurrences)
}

fn load_documents(conn: &Connection, entity_id: &str) -> ExpertiseResult<Vec<i64>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT document_id FROM entity_documents WHERE entity_id = ?1 ORDER BY document_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![entity_id], |row| row.get::<_, i64>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
