//! Dispatch from [`ScoringKind`] to its implementation, and ranking of
//! candidate sets with one scoring function.

use std::collections::HashSet;

use tracing::warn;

use expertise_core::errors::ScoringError;
use expertise_core::models::{
    sort_ranked, Author, EntityId, RankedAuthor, ScoringKind, SignalFamily, TermAuthorHits,
};
use expertise_core::traits::EntityPair;

use crate::context::ScoringContext;
use crate::{entity, relatedness, term};

/// Score one author with an entity-family function.
pub fn score_author(
    kind: ScoringKind,
    ctx: &ScoringContext,
    author: &Author,
) -> Result<f64, ScoringError> {
    match kind {
        ScoringKind::EfIaf => entity::ef_iaf(ctx, author),
        ScoringKind::EcIaf => Ok(entity::ec_iaf(ctx, author)),
        ScoringKind::LogEcEfIaf => entity::log_ec_ef_iaf(ctx, author),
        ScoringKind::CosineEfIaf => entity::cosine_ef_iaf(ctx, author),
        ScoringKind::RelatednessGeometric => relatedness::relatedness_geometric(ctx, author),
        ScoringKind::RelatednessTopK => relatedness::relatedness_top_k(ctx, author),
        ScoringKind::TermMax | ScoringKind::TermMean => {
            Err(wrong_family(kind, SignalFamily::Entity))
        }
    }
}

/// Rank `authors` by `kind`, best first, ties by author id.
///
/// An author whose score is undefined (inconsistent statistics) is ranked
/// with 0; any other error aborts the whole signal.
pub fn score_authors(
    kind: ScoringKind,
    ctx: &ScoringContext,
    authors: &[Author],
) -> Result<Vec<RankedAuthor>, ScoringError> {
    if kind.family() != SignalFamily::Entity {
        return Err(wrong_family(kind, SignalFamily::Entity));
    }
    let mut ranking = Vec::with_capacity(authors.len());
    for author in authors {
        let score = match score_author(kind, ctx, author) {
            Ok(score) => score,
            Err(ScoringError::Undefined { reason }) => {
                warn!(
                    author_id = %author.author_id,
                    %kind,
                    %reason,
                    "score undefined, ranked as zero"
                );
                0.0
            }
            Err(e) => return Err(e),
        };
        ranking.push(RankedAuthor::new(&author.author_id, &author.name, score));
    }
    sort_ranked(&mut ranking);
    Ok(ranking)
}

/// Rank authors of full-text hits by `kind`, best first, ties by author id.
pub fn score_term_authors(
    kind: ScoringKind,
    grouped: &[TermAuthorHits],
) -> Result<Vec<RankedAuthor>, ScoringError> {
    let score: fn(&TermAuthorHits) -> f64 = match kind {
        ScoringKind::TermMax => term::term_max,
        ScoringKind::TermMean => term::term_mean,
        _ => return Err(wrong_family(kind, SignalFamily::Term)),
    };
    let mut ranking: Vec<RankedAuthor> = grouped
        .iter()
        .map(|hits| RankedAuthor::new(&hits.author_id, &hits.name, score(hits)))
        .collect();
    sort_ranked(&mut ranking);
    Ok(ranking)
}

/// Every (query entity, author entity) pair relatedness scoring will look
/// up, each unordered pair once, in first-seen order.
pub fn relatedness_pairs(
    query_entities: &[EntityId],
    authors: &[Author],
    min_author_entity_score: f64,
) -> Vec<EntityPair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for author in authors {
        for (author_entity, _) in author.entities_above(min_author_entity_score) {
            for query_entity in query_entities {
                let key = if query_entity <= author_entity {
                    (query_entity.clone(), author_entity.clone())
                } else {
                    (author_entity.clone(), query_entity.clone())
                };
                if seen.insert(key) {
                    pairs.push((query_entity.clone(), author_entity.clone()));
                }
            }
        }
    }
    pairs
}

fn wrong_family(kind: ScoringKind, expected: SignalFamily) -> ScoringError {
    ScoringError::InvalidPlan {
        reason: format!("{kind} is not a {expected:?} scoring function"),
    }
}
