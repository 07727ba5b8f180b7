//! BM25 search over document bodies through the FTS5 index.

use rusqlite::{params, Connection};

use expertise_core::errors::ExpertiseResult;
use expertise_core::models::TermHit;

use crate::to_storage_err;

/// Reduce free text to an FTS5 query: every alphanumeric run becomes a
/// quoted term and terms are OR-ed. `None` when nothing searchable remains.
pub fn to_fts_query(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"", term.to_lowercase()))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// Top `top_k` documents by BM25; the score is `-bm25`, so higher is better.
pub fn search(conn: &Connection, text: &str, top_k: usize) -> ExpertiseResult<Vec<TermHit>> {
    let Some(query) = to_fts_query(text) else {
        return Ok(Vec::new());
    };
    let mut stmt = conn
        .prepare_cached(
            "SELECT d.document_id, d.author_id, COALESCE(a.name, d.author_id), d.year,
                    -bm25(documents_fts)
             FROM documents_fts
             JOIN documents d ON d.document_id = documents_fts.rowid
             LEFT JOIN authors a ON a.author_id = d.author_id
             WHERE documents_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![query, top_k as i64], |row| {
            Ok(TermHit {
                document_id: row.get(0)?,
                author_id: row.get(1)?,
                author_name: row.get(2)?,
                year: row.get(3)?,
                score: row.get(4)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
