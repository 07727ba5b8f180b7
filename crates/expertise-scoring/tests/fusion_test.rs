use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use expertise_core::config::ScoringConfig;
use expertise_core::models::{
    Author, AuthorEntityStat, AuthorInfo, FusionStrategy, RankedAuthor, ScoringKind, SignalFamily,
};
use expertise_scoring::fusion::{fuse, merge, normalize, pairwise_sum};
use expertise_scoring::{score_author, ScoringContext};

fn ranked(items: &[(&str, f64)]) -> Vec<RankedAuthor> {
    items.iter().map(|(id, s)| RankedAuthor::new(*id, *id, *s)).collect()
}

fn ids(ranking: &[RankedAuthor]) -> Vec<&str> {
    ranking.iter().map(|r| r.author_id.as_str()).collect()
}

#[test]
fn entity_and_term_fusion_scenario() {
    let mut entity = ranked(&[("A1", 4.0), ("A2", 2.0)]);
    let mut term = ranked(&[("A1", 10.0), ("A3", 5.0)]);
    normalize(&mut entity);
    normalize(&mut term);
    assert_eq!(entity[1].score, 0.5);
    assert_eq!(term[1].score, 0.5);

    let fused = pairwise_sum(&entity, &term);
    assert_eq!(ids(&fused), vec!["A1", "A3", "A2"]);
    assert_eq!(fused[0].score, 2.0);
    assert_eq!(fused[1].score, 0.5);
    assert_eq!(fused[2].score, 0.5);

    let via_fuse = fuse(
        vec![
            (SignalFamily::Entity, ranked(&[("A1", 4.0), ("A2", 2.0)]), 1.0),
            (SignalFamily::Term, ranked(&[("A1", 10.0), ("A3", 5.0)]), 1.0),
        ],
        FusionStrategy::PairwiseSum,
    );
    assert_eq!(via_fuse, fused);
}

#[test]
fn weighted_average_fusion_of_same_scenario() {
    let fused = fuse(
        vec![
            (SignalFamily::Entity, ranked(&[("A1", 4.0), ("A2", 2.0)]), 1.0),
            (SignalFamily::Term, ranked(&[("A1", 10.0), ("A3", 5.0)]), 1.0),
        ],
        FusionStrategy::WeightedAverage,
    );
    assert_eq!(ids(&fused), vec!["A1", "A2", "A3"]);
    assert_eq!(fused[0].score, 1.0);
    assert_eq!(fused[1].score, 0.25);
    assert_eq!(fused[2].score, 0.25);
}

#[test]
fn empty_signal_contributes_nothing_but_keeps_its_weight() {
    let fused = fuse(
        vec![
            (SignalFamily::Entity, ranked(&[("A1", 3.0)]), 1.0),
            (SignalFamily::Term, Vec::new(), 1.0),
        ],
        FusionStrategy::WeightedAverage,
    );
    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].score, 0.5);
}

fn ranking_strategy() -> impl Strategy<Value = Vec<RankedAuthor>> {
    prop::collection::btree_map("[a-f]{1,2}", 0.001f64..1000.0, 1..12).prop_map(|scores| {
        let mut ranking: Vec<RankedAuthor> = scores
            .into_iter()
            .map(|(id, score)| RankedAuthor::new(id.clone(), id, score))
            .collect();
        expertise_core::models::sort_ranked(&mut ranking);
        ranking
    })
}

proptest! {
    #[test]
    fn normalize_max_is_one_and_order_kept(mut ranking in ranking_strategy()) {
        let before = ids(&ranking).into_iter().map(String::from).collect::<Vec<_>>();
        normalize(&mut ranking);
        let max = ranking.iter().map(|r| r.score).fold(f64::MIN, f64::max);
        prop_assert!((max - 1.0).abs() < 1e-12);
        let after: Vec<String> = ids(&ranking).into_iter().map(String::from).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn merge_yields_union(
        signals in prop::collection::vec((ranking_strategy(), 0.0f64..5.0), 1..4)
    ) {
        let expected: HashSet<String> = signals
            .iter()
            .flat_map(|(ranking, _)| ranking.iter().map(|r| r.author_id.clone()))
            .collect();
        let merged = merge(&signals);
        let got: HashSet<String> = merged.iter().map(|r| r.author_id.clone()).collect();
        prop_assert_eq!(merged.len(), got.len());
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn ec_iaf_is_never_negative(
        author_entities in prop::collection::btree_map("e[0-9]", 1u32..20, 0..8),
        query in prop::collection::vec("e[0-9]", 1..5),
        total in 1u64..1000,
        popularity_seed in prop::collection::vec(1u64..1000, 10),
    ) {
        let popularity: HashMap<String, u64> = (0..10)
            .map(|i| (format!("e{i}"), popularity_seed[i].min(total)))
            .collect();
        let mut query = query;
        query.dedup();
        let ctx = ScoringContext::new(query.clone(), popularity, total, ScoringConfig::default());

        let mut author = Author::new(&AuthorInfo::new("a", "A", "U"));
        for (entity, count) in &author_entities {
            author.entities.insert(
                entity.clone(),
                AuthorEntityStat { max_score: 0.5, document_count: *count, years: vec![2000] },
            );
        }
        author.document_ids = (0..20).collect();

        let score = score_author(ScoringKind::EcIaf, &ctx, &author).unwrap();
        prop_assert!(score >= 0.0);
        if query.iter().all(|q| !author_entities.contains_key(q)) {
            prop_assert_eq!(score, 0.0);
        }
    }
}
