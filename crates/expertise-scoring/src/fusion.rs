//! Cross-signal normalization and fusion.

use std::collections::{HashMap, HashSet};

use expertise_core::models::{sort_ranked, AuthorId, FusionStrategy, RankedAuthor, SignalFamily};

/// Divide every score by the list's maximum. Order is preserved. An empty
/// list is left alone; a non-positive maximum is treated as 1.
pub fn normalize(results: &mut [RankedAuthor]) {
    let Some(max) = results.iter().map(|r| r.score).reduce(f64::max) else {
        return;
    };
    let divisor = if max > 0.0 { max } else { 1.0 };
    for result in results.iter_mut() {
        result.score /= divisor;
    }
}

/// Weighted average over the union of authors in `signals`. An author
/// missing from a signal scores 0 there. Best first, ties by author id.
pub fn merge(signals: &[(Vec<RankedAuthor>, f64)]) -> Vec<RankedAuthor> {
    let total_weight: f64 = signals.iter().map(|(_, weight)| weight).sum();
    let divisor = if total_weight > 0.0 { total_weight } else { 1.0 };

    let mut merged: HashMap<&AuthorId, RankedAuthor> = HashMap::new();
    for (results, weight) in signals {
        for result in results {
            merged
                .entry(&result.author_id)
                .or_insert_with(|| RankedAuthor::new(&result.author_id, &result.name, 0.0))
                .score += weight * result.score;
        }
    }

    let mut ranking: Vec<RankedAuthor> = merged
        .into_values()
        .map(|mut author| {
            author.score /= divisor;
            author
        })
        .collect();
    sort_ranked(&mut ranking);
    ranking
}

/// Normalize each signal, then [`merge`].
pub fn normalize_merge(mut signals: Vec<(Vec<RankedAuthor>, f64)>) -> Vec<RankedAuthor> {
    for (results, _) in signals.iter_mut() {
        normalize(results);
    }
    merge(&signals)
}

/// Combine an entity ranking and a term ranking by summing the scores of
/// authors found in both.
///
/// Output blocks, each in its input order: authors in both lists (term
/// order), term-only authors, entity-only authors.
pub fn pairwise_sum(entity: &[RankedAuthor], term: &[RankedAuthor]) -> Vec<RankedAuthor> {
    let entity_scores: HashMap<&str, f64> = entity
        .iter()
        .map(|r| (r.author_id.as_str(), r.score))
        .collect();

    let mut both = Vec::new();
    let mut term_only = Vec::new();
    for result in term {
        match entity_scores.get(result.author_id.as_str()) {
            Some(entity_score) => both.push(RankedAuthor {
                score: result.score + entity_score,
                ..result.clone()
            }),
            None => term_only.push(result.clone()),
        }
    }
    let term_ids: HashSet<&str> = term.iter().map(|r| r.author_id.as_str()).collect();
    let entity_only = entity
        .iter()
        .filter(|r| !term_ids.contains(r.author_id.as_str()))
        .cloned();

    both.into_iter().chain(term_only).chain(entity_only).collect()
}

/// Fuse per-signal rankings `(family, ranking, weight)` into one.
///
/// `WeightedAverage` normalizes and merges every signal. `PairwiseSum`
/// normalizes and merges each family on its own, then combines the two
/// families with [`pairwise_sum`].
pub fn fuse(
    signals: Vec<(SignalFamily, Vec<RankedAuthor>, f64)>,
    strategy: FusionStrategy,
) -> Vec<RankedAuthor> {
    match strategy {
        FusionStrategy::WeightedAverage => normalize_merge(
            signals
                .into_iter()
                .map(|(_, ranking, weight)| (ranking, weight))
                .collect(),
        ),
        FusionStrategy::PairwiseSum => {
            let (entity, term): (Vec<_>, Vec<_>) = signals
                .into_iter()
                .partition(|(family, _, _)| *family == SignalFamily::Entity);
            let family_ranking = |signals: Vec<(SignalFamily, Vec<RankedAuthor>, f64)>| {
                if signals.is_empty() {
                    return Vec::new();
                }
                normalize_merge(signals.into_iter().map(|(_, r, w)| (r, w)).collect())
            };
            pairwise_sum(&family_ranking(entity), &family_ranking(term))
        }
    }
}
