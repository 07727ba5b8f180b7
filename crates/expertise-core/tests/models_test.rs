use std::collections::BTreeSet;

use expertise_core::models::*;
use expertise_core::ExpertiseError;
use proptest::prelude::*;

#[test]
fn author_info_requires_every_field() {
    let ok = AuthorInfo::new("a1", "Ada", "Uni");
    assert!(ok.validate().is_ok());

    let blank = AuthorInfo::new("a1", "  ", "Uni");
    let err = blank.validate().unwrap_err();
    assert!(err.to_string().contains("name"));
}

#[test]
fn entities_above_filters_by_max_score() {
    let mut author = Author::new(&AuthorInfo::new("a1", "Ada", "Uni"));
    author.entities.insert("X".into(), AuthorEntityStat::new(0.9, 2001));
    author.entities.insert("Y".into(), AuthorEntityStat::new(0.1, 2002));
    let kept: Vec<_> = author.entities_above(0.2).map(|(id, _)| id.clone()).collect();
    assert_eq!(kept, vec!["X".to_string()]);
}

#[test]
fn popularity_by_measure() {
    let mut entity = EntityPopularity::new("X", "X topic");
    entity.documents = vec![1, 2, 3];
    entity.occurrences.insert(
        "a1".into(),
        AuthorOccurrence {
            count: 2,
            max_score: 0.5,
            years: BTreeSet::from([2001]),
        },
    );
    assert_eq!(entity.popularity(PopularityMeasure::Documents), 3);
    assert_eq!(entity.popularity(PopularityMeasure::Authors), 1);
    assert_eq!(entity.citing_authors(0.6).count(), 0);
    assert_eq!(entity.citing_authors(0.5).count(), 1);
}

#[test]
fn sort_ranked_breaks_ties_by_author_id() {
    let mut ranking = vec![
        RankedAuthor::new("b", "B", 1.0),
        RankedAuthor::new("c", "C", 2.0),
        RankedAuthor::new("a", "A", 1.0),
    ];
    sort_ranked(&mut ranking);
    let ids: Vec<_> = ranking.iter().map(|r| r.author_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn scoring_kind_parses_canonical_and_legacy_names() {
    for kind in ScoringKind::ALL {
        assert_eq!(kind.name().parse::<ScoringKind>().unwrap(), kind);
    }
    assert_eq!("eciaf_score".parse::<ScoringKind>().unwrap(), ScoringKind::EcIaf);
    assert_eq!("relatedness_geom".parse::<ScoringKind>().unwrap(), ScoringKind::RelatednessGeometric);
    assert_eq!("lucene_mean_score".parse::<ScoringKind>().unwrap(), ScoringKind::TermMean);
    assert!("nope".parse::<ScoringKind>().is_err());
}

#[test]
fn scoring_kind_families() {
    assert_eq!(ScoringKind::TermMax.family(), SignalFamily::Term);
    assert_eq!(ScoringKind::CosineEfIaf.family(), SignalFamily::Entity);
    assert!(ScoringKind::RelatednessTopK.needs_relatedness());
    assert!(!ScoringKind::EcIaf.needs_relatedness());
}

#[test]
fn plan_from_legacy_array() {
    let plan = ScoringPlan::from_json(
        r#"[{"name": "eciaf_score", "weight": 0.6}, {"name": "lucene_max_score", "weight": 0.4}]"#,
    )
    .unwrap();
    assert_eq!(plan.fusion, FusionStrategy::WeightedAverage);
    assert_eq!(plan.signals[0], SignalSpec::new(ScoringKind::EcIaf, 0.6));
    assert!(plan.uses_family(SignalFamily::Term));
}

#[test]
fn plan_from_object_with_fusion() {
    let plan = ScoringPlan::from_json(
        r#"{"signals": [{"name": "ef_iaf"}, {"name": "term_mean", "weight": 2}], "fusion": "pairwise_sum"}"#,
    )
    .unwrap();
    assert_eq!(plan.fusion, FusionStrategy::PairwiseSum);
    assert_eq!(plan.signals[0].weight, 1.0);
    assert_eq!(plan.total_weight(), 3.0);
}

#[test]
fn plan_rejects_unknown_function() {
    let err = ScoringPlan::from_json(r#"[{"name": "pagerank", "weight": 1}]"#).unwrap_err();
    assert!(matches!(err, ExpertiseError::ScoringError(_)));
    assert!(err.to_string().contains("pagerank"));
}

#[test]
fn plan_rejects_empty_and_zero_weight() {
    assert!(ScoringPlan::from_json("[]").is_err());
    assert!(ScoringPlan::from_json(r#"[{"name": "ec_iaf", "weight": 0}]"#).is_err());
    assert!(ScoringPlan::from_json(r#"[{"name": "ec_iaf", "weight": -1}]"#).is_err());
}

proptest! {
    #[test]
    fn sort_ranked_is_descending(scores in prop::collection::vec(0.0f64..100.0, 0..40)) {
        let mut ranking: Vec<_> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| RankedAuthor::new(format!("a{i:03}"), "", *s))
            .collect();
        sort_ranked(&mut ranking);
        for pair in ranking.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].author_id < pair[1].author_id);
            }
        }
    }
}
