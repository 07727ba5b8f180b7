//! Relatedness-based scoring. Both functions compare every query entity
//! with the author's confident entities through prefetched relatedness.

use std::cmp::Ordering;

use expertise_core::errors::ScoringError;
use expertise_core::models::{Author, AuthorEntityStat, EntityId};

use crate::context::ScoringContext;

/// `exp(Σ w·ln v / Σ w)`; `None` when the weights sum to zero.
pub fn weighted_geometric_mean(values_weights: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = values_weights.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted_logs: f64 = values_weights.iter().map(|(v, w)| w * v.ln()).sum();
    Some((weighted_logs / total_weight).exp())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn confident_entities<'a>(
    ctx: &ScoringContext,
    author: &'a Author,
) -> Vec<(&'a EntityId, &'a AuthorEntityStat)> {
    author
        .entities_above(ctx.config.min_author_entity_score)
        .collect()
}

/// For each query entity q, with `r` the relatedness of q to an author
/// entity, `x` the exponent and `α` the smoothing term:
///
/// `s(q) = clip(1 - WGM(1 - r^x + α; weight = EC · max_score) + α, 0, 1)^(1/x)`
///
/// The score is the mean of `s(q)` over query entities. A query entity
/// whose weights sum to zero contributes 0.
pub fn relatedness_geometric(ctx: &ScoringContext, author: &Author) -> Result<f64, ScoringError> {
    let alpha = ctx.config.relatedness_alpha;
    let x = ctx.config.relatedness_exponent;
    let entities = confident_entities(ctx, author);

    let mut per_query = Vec::with_capacity(ctx.query_entities.len());
    for query_entity in &ctx.query_entities {
        let mut values_weights = Vec::with_capacity(entities.len());
        for (author_entity, stat) in &entities {
            let r = ctx
                .relatedness
                .lookup(query_entity, author_entity)?
                .clamp(0.0, 1.0);
            let weight = f64::from(stat.document_count) * stat.max_score;
            values_weights.push((1.0 - r.powf(x) + alpha, weight));
        }
        let value = match weighted_geometric_mean(&values_weights) {
            Some(wgm) => (1.0 - wgm + alpha).clamp(0.0, 1.0).powf(1.0 / x),
            None => 0.0,
        };
        per_query.push(value);
    }
    Ok(mean(&per_query))
}

/// For each query entity, score every confident author entity as
/// `max_score · relatedness · ln(1 + EC)` and average the best `k`.
/// The score is the mean over query entities; 0 for an author without entities.
pub fn relatedness_top_k(ctx: &ScoringContext, author: &Author) -> Result<f64, ScoringError> {
    let entities = confident_entities(ctx, author);
    if entities.is_empty() {
        return Ok(0.0);
    }
    let k = ctx.config.relatedness_top_k.max(1);

    let mut per_query = Vec::with_capacity(ctx.query_entities.len());
    for query_entity in &ctx.query_entities {
        let mut scores = Vec::with_capacity(entities.len());
        for (author_entity, stat) in &entities {
            let r = ctx.relatedness.lookup(query_entity, author_entity)?;
            scores.push(stat.max_score * r * (1.0 + f64::from(stat.document_count)).ln());
        }
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        scores.truncate(k);
        per_query.push(mean(&scores));
    }
    Ok(mean(&per_query))
}
