use std::collections::HashMap;

use expertise_core::config::ScoringConfig;
use expertise_core::errors::ScoringError;
use expertise_core::models::{Author, AuthorEntityStat, AuthorInfo, ScoringKind, TermAuthorHits};
use expertise_scoring::{
    relatedness_pairs, score_author, score_authors, score_term_authors, RelatednessTable,
    ScoringContext,
};

fn author(id: &str, entities: &[(&str, f64, u32)], documents: i64) -> Author {
    let mut author = Author::new(&AuthorInfo::new(id, format!("Name {id}"), "Uni"));
    for (entity, max_score, count) in entities {
        author.entities.insert(
            entity.to_string(),
            AuthorEntityStat {
                max_score: *max_score,
                document_count: *count,
                years: vec![2015; *count as usize],
            },
        );
    }
    author.document_ids = (1..=documents).collect();
    author
}

fn context(query: &[&str], popularity: &[(&str, u64)], total: u64) -> ScoringContext {
    ScoringContext::new(
        query.iter().map(|s| s.to_string()).collect(),
        popularity
            .iter()
            .map(|(e, p)| (e.to_string(), *p))
            .collect::<HashMap<_, _>>(),
        total,
        ScoringConfig::default(),
    )
}

#[test]
fn single_entity_worked_example() {
    let ctx = context(&["E1"], &[("E1", 10)], 100);
    let a = author("A", &[("E1", 0.9, 3)], 6);
    let ln10 = 10f64.ln();

    let ec = score_author(ScoringKind::EcIaf, &ctx, &a).unwrap();
    assert!((ec - 6.907755).abs() < 1e-5);
    let ef = score_author(ScoringKind::EfIaf, &ctx, &a).unwrap();
    assert!((ef - 3.0 / 6.0 * ln10).abs() < 1e-12);
}

#[test]
fn frequency_scores_skip_weak_author_entities() {
    let ctx = context(&["E1", "E2"], &[("E1", 10), ("E2", 10)], 100);
    let noisy = author("A", &[("E1", 0.9, 1), ("E2", 0.05, 5)], 5);
    let clean = author("A", &[("E1", 0.9, 1)], 5);
    let weight = 10f64.ln() / 2.0;

    let ec = score_author(ScoringKind::EcIaf, &ctx, &noisy).unwrap();
    assert!((ec - weight).abs() < 1e-12);
    let ef = score_author(ScoringKind::EfIaf, &ctx, &noisy).unwrap();
    assert!((ef - 0.2 * weight).abs() < 1e-12);
    for kind in [ScoringKind::EcIaf, ScoringKind::EfIaf, ScoringKind::LogEcEfIaf] {
        assert_eq!(
            score_author(kind, &ctx, &noisy).unwrap(),
            score_author(kind, &ctx, &clean).unwrap(),
            "{kind:?}"
        );
    }
}

#[test]
fn iaf_is_shared_across_query_entities() {
    let ctx = context(&["E1", "E2"], &[("E1", 10), ("E2", 1)], 100);
    let a = author("A", &[("E1", 0.9, 2), ("E2", 0.5, 1)], 3);
    let expected = 2.0 * 0.5 * 10f64.ln() + 1.0 * 0.5 * 100f64.ln();
    let ec = score_author(ScoringKind::EcIaf, &ctx, &a).unwrap();
    assert!((ec - expected).abs() < 1e-9);
}

#[test]
fn ranking_is_descending_with_id_ties() {
    let ctx = context(&["E1"], &[("E1", 10)], 100);
    let authors = vec![
        author("c", &[("E1", 0.9, 1)], 1),
        author("b", &[("E1", 0.9, 2)], 2),
        author("a", &[("E1", 0.9, 1)], 1),
        author("d", &[("E9", 0.9, 5)], 5),
    ];
    let ranking = score_authors(ScoringKind::EcIaf, &ctx, &authors).unwrap();
    let ids: Vec<_> = ranking.iter().map(|r| r.author_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c", "d"]);
    assert_eq!(ranking[3].score, 0.0);
    assert_eq!(ranking[0].name, "Name b");
}

#[test]
fn undefined_author_ranks_as_zero() {
    let ctx = context(&["E1"], &[("E1", 10)], 100);
    let authors = vec![author("broken", &[("E1", 0.9, 2)], 0), author("ok", &[("E1", 0.9, 1)], 2)];
    let ranking = score_authors(ScoringKind::EfIaf, &ctx, &authors).unwrap();
    assert_eq!(ranking[0].author_id, "ok");
    assert_eq!(ranking[1].score, 0.0);
}

#[test]
fn family_mismatch_is_rejected() {
    let ctx = context(&["E1"], &[("E1", 10)], 100);
    let err = score_authors(ScoringKind::TermMax, &ctx, &[]).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidPlan { .. }));
    let err = score_term_authors(ScoringKind::EcIaf, &[]).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidPlan { .. }));
}

#[test]
fn term_authors_ranked_by_max_and_mean() {
    let mut a = TermAuthorHits::new("a", "Ada");
    a.scores.extend([(1, 9.0), (2, 1.0)]);
    let mut b = TermAuthorHits::new("b", "Bob");
    b.scores.extend([(3, 6.0), (4, 6.0)]);

    let by_max = score_term_authors(ScoringKind::TermMax, &[a.clone(), b.clone()]).unwrap();
    assert_eq!(by_max[0].author_id, "a");
    let by_mean = score_term_authors(ScoringKind::TermMean, &[a, b]).unwrap();
    assert_eq!(by_mean[0].author_id, "b");
    assert_eq!(by_mean[0].score, 6.0);
}

fn table(values: &[(&str, &str, f64)]) -> RelatednessTable {
    values
        .iter()
        .map(|(a, b, r)| ((a.to_string(), b.to_string()), *r))
        .collect()
}

#[test]
fn geometric_relatedness_bounds() {
    let related = context(&["Q"], &[], 100).with_relatedness(table(&[("Q", "A", 1.0)]));
    let unrelated = context(&["Q"], &[], 100).with_relatedness(table(&[("A", "Q", 0.0)]));
    let a = author("a", &[("A", 0.8, 2)], 2);

    let top = score_author(ScoringKind::RelatednessGeometric, &related, &a).unwrap();
    assert!((top - 1.0).abs() < 1e-9);
    let bottom = score_author(ScoringKind::RelatednessGeometric, &unrelated, &a).unwrap();
    // The final root amplifies rounding residue around zero.
    assert!((0.0..0.05).contains(&bottom));
}

#[test]
fn geometric_relatedness_prefers_closer_authors() {
    let ctx = context(&["Q"], &[], 100).with_relatedness(table(&[
        ("Q", "Near", 0.95),
        ("Q", "Far", 0.2),
    ]));
    let near = author("near", &[("Near", 0.9, 3)], 3);
    let far = author("far", &[("Far", 0.9, 3)], 3);
    let ranking = score_authors(ScoringKind::RelatednessGeometric, &ctx, &[far, near]).unwrap();
    assert_eq!(ranking[0].author_id, "near");
    assert!(ranking[0].score <= 1.0 && ranking[1].score >= 0.0);
}

#[test]
fn geometric_relatedness_ignores_weak_entities_and_empty_authors() {
    let ctx = context(&["Q"], &[], 100).with_relatedness(table(&[("Q", "A", 1.0)]));
    // "Weak" is below the author entity threshold and never looked up.
    let a = author("a", &[("A", 0.8, 1), ("Weak", 0.1, 4)], 4);
    let score = score_author(ScoringKind::RelatednessGeometric, &ctx, &a).unwrap();
    assert!((score - 1.0).abs() < 1e-9);

    let empty = author("e", &[], 0);
    assert_eq!(score_author(ScoringKind::RelatednessGeometric, &ctx, &empty).unwrap(), 0.0);
    assert_eq!(score_author(ScoringKind::RelatednessTopK, &ctx, &empty).unwrap(), 0.0);
}

#[test]
fn top_k_relatedness_averages_best_entities() {
    let entities: Vec<(String, f64, u32)> = (0..7).map(|i| (format!("E{i}"), 1.0, 1)).collect();
    let refs: Vec<(&str, f64, u32)> =
        entities.iter().map(|(e, s, c)| (e.as_str(), *s, *c)).collect();
    let a = author("a", &refs, 1);
    let mut rel = RelatednessTable::new();
    for (i, (entity, _, _)) in entities.iter().enumerate() {
        // Five fully related entities, two unrelated.
        rel.insert("Q", entity, if i < 5 { 1.0 } else { 0.0 });
    }
    let ctx = context(&["Q"], &[], 100).with_relatedness(rel);
    let score = score_author(ScoringKind::RelatednessTopK, &ctx, &a).unwrap();
    assert!((score - 2f64.ln()).abs() < 1e-12);
}

#[test]
fn missing_relatedness_fails_the_signal() {
    let ctx = context(&["Q"], &[], 100);
    let a = author("a", &[("A", 0.8, 1)], 1);
    let err = score_authors(ScoringKind::RelatednessTopK, &ctx, &[a]).unwrap_err();
    assert!(matches!(err, ScoringError::MissingRelatedness { .. }));
}

#[test]
fn relatedness_pairs_cover_confident_entities_once() {
    let authors = vec![
        author("a", &[("A", 0.8, 1), ("B", 0.1, 1)], 1),
        author("b", &[("A", 0.9, 1), ("Q", 0.9, 1)], 1),
    ];
    let query = vec!["Q".to_string(), "A".to_string()];
    let pairs = relatedness_pairs(&query, &authors, 0.2);
    assert_eq!(
        pairs,
        vec![
            ("Q".to_string(), "A".to_string()),
            ("A".to_string(), "A".to_string()),
            ("Q".to_string(), "Q".to_string()),
        ]
    );
}
