//! Frequency-based entity scoring: EF·IAF, EC·IAF, log(EC)+EF·IAF, cosine.
//!
//! Sums run over the intersection of the weighted query entities and the
//! author's entities with `max_score >= min_author_entity_score`, where every
//! count is at least one.

use expertise_core::errors::ScoringError;
use expertise_core::models::{Author, AuthorEntityStat};

use crate::context::ScoringContext;

/// `Σ EC(e) * IAF(e)`.
pub fn ec_iaf(ctx: &ScoringContext, author: &Author) -> f64 {
    ctx.weights
        .iter()
        .filter_map(|(entity, weight)| {
            let stat = confident_stat(ctx, author, entity)?;
            Some(f64::from(stat.document_count) * weight)
        })
        .sum()
}

/// `Σ EF(e) * IAF(e)` with `EF(e) = EC(e) / author document count`.
pub fn ef_iaf(ctx: &ScoringContext, author: &Author) -> Result<f64, ScoringError> {
    let mut score = 0.0;
    for (entity, weight) in &ctx.weights {
        if let Some(stat) = confident_stat(ctx, author, entity) {
            score += entity_frequency(author, stat.document_count)? * weight;
        }
    }
    Ok(score)
}

/// `Σ (ln EC(e) + EF(e)) * IAF(e)`.
pub fn log_ec_ef_iaf(ctx: &ScoringContext, author: &Author) -> Result<f64, ScoringError> {
    let mut score = 0.0;
    for (entity, weight) in &ctx.weights {
        if let Some(stat) = confident_stat(ctx, author, entity) {
            if stat.document_count == 0 {
                return Err(ScoringError::Undefined {
                    reason: format!("{} has a zero count for {entity}", author.author_id),
                });
            }
            let ec = f64::from(stat.document_count);
            score += (ec.ln() + entity_frequency(author, stat.document_count)?) * weight;
        }
    }
    Ok(score)
}

/// Normalized dot product of the author's EF·IAF vector and a flat query
/// vector (`1 / |query|` per query entity). The denominator is
/// `sqrt(Σ author) * sqrt(Σ query)`; a zero denominator scores 0.
pub fn cosine_ef_iaf(ctx: &ScoringContext, author: &Author) -> Result<f64, ScoringError> {
    if ctx.query_entities.is_empty() {
        return Ok(0.0);
    }
    let query_weight = 1.0 / ctx.query_entities.len() as f64;

    let mut author_sum = 0.0;
    let mut dot = 0.0;
    for (entity, stat) in author.entities_above(ctx.config.min_author_entity_score) {
        let Some(iaf) = ctx.iaf(entity) else {
            continue;
        };
        let value = entity_frequency(author, stat.document_count)? * iaf;
        author_sum += value;
        if ctx.query_entities.contains(entity) {
            dot += value * query_weight;
        }
    }
    let query_sum = query_weight * ctx.query_entities.len() as f64;

    let denominator = author_sum.sqrt() * query_sum.sqrt();
    if denominator > 0.0 && denominator.is_finite() {
        Ok(dot / denominator)
    } else {
        Ok(0.0)
    }
}

/// The author's statistics for `entity`, unless its best annotation is too weak.
fn confident_stat<'a>(
    ctx: &ScoringContext,
    author: &'a Author,
    entity: &str,
) -> Option<&'a AuthorEntityStat> {
    author
        .entities
        .get(entity)
        .filter(|stat| stat.max_score >= ctx.config.min_author_entity_score)
}

fn entity_frequency(author: &Author, count: u32) -> Result<f64, ScoringError> {
    let documents = author.document_count();
    if documents == 0 {
        return Err(ScoringError::Undefined {
            reason: format!("{} has entity counts but no documents", author.author_id),
        });
    }
    Ok(f64::from(count) / documents as f64)
}
