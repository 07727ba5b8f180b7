use expertise_core::config::*;
use expertise_core::models::{FusionStrategy, PopularityMeasure, ScoringKind};
use expertise_core::ExpertiseError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = ExpertiseConfig::from_toml("").unwrap();

    assert_eq!(config.storage.db_path, "expertise.db");
    assert_eq!(config.storage.read_pool_size, 4);

    assert_eq!(config.ingestion.min_document_length, 10);
    assert_eq!(config.ingestion.min_annotation_score, 0.0);
    assert!(config.ingestion.min_year.is_none());

    assert_eq!(config.scoring.popularity_measure, PopularityMeasure::Documents);
    assert_eq!(config.scoring.min_author_entity_score, 0.20);
    assert_eq!(config.scoring.relatedness_alpha, 1e-5);
    assert_eq!(config.scoring.relatedness_exponent, 10.0);
    assert_eq!(config.scoring.relatedness_top_k, 5);

    assert_eq!(config.retrieval.citing_min_score, 0.20);
    assert_eq!(config.retrieval.query_min_score, 0.20);
    assert_eq!(config.retrieval.term_top_k, 40);
    assert_eq!(config.retrieval.fusion, FusionStrategy::WeightedAverage);
    assert_eq!(config.retrieval.signals.len(), 1);
    assert_eq!(config.retrieval.signals[0].kind, ScoringKind::EcIaf);

    assert_eq!(config.services.timeout_ms, 10_000);
    assert_eq!(config.services.max_retries, 3);
    assert_eq!(config.services.initial_backoff_ms, 50);
    assert_eq!(config.services.max_backoff_ms, 2_000);
    assert_eq!(config.services.annotation_cache_capacity, 10_000);
    assert!(config.services.cache_path.is_none());

    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[storage]
db_path = "/data/stats.db"

[scoring]
popularity_measure = "authors"

[retrieval]
fusion = "pairwise_sum"
signals = [
    { name = "ec_iaf", weight = 0.7 },
    { name = "lucene_max_score", weight = 0.3 },
]
"#;
    let config = ExpertiseConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.db_path, "/data/stats.db");
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.scoring.popularity_measure, PopularityMeasure::Authors);
    assert_eq!(config.retrieval.fusion, FusionStrategy::PairwiseSum);

    let plan = config.retrieval.default_plan();
    assert_eq!(plan.signals[1].kind, ScoringKind::TermMax);
    assert!((plan.total_weight() - 1.0).abs() < 1e-12);
}

#[test]
fn config_rejects_out_of_range_threshold() {
    let err = ExpertiseConfig::from_toml("[retrieval]\nciting_min_score = 1.5\n")
        .unwrap_err();
    assert!(matches!(err, ExpertiseError::ConfigError { .. }));
    assert!(err.to_string().contains("citing_min_score"));
}

#[test]
fn config_rejects_inverted_year_range() {
    let err = ExpertiseConfig::from_toml("[ingestion]\nmin_year = 2020\nmax_year = 2010\n").unwrap_err();
    assert!(err.to_string().contains("min_year"));
}

#[test]
fn config_rejects_unknown_signal_name() {
    let toml = "[retrieval]\nsignals = [{ name = \"bm99\", weight = 1.0 }]\n";
    assert!(ExpertiseConfig::from_toml(toml).is_err());
}

#[test]
fn env_overrides_replace_file_values() {
    let mut config = ExpertiseConfig::default();
    config.apply_env_overrides(|key| match key {
        "EXPERTISE_DB_PATH" => Some("/tmp/override.db".to_string()),
        "EXPERTISE_SERVICE_TOKEN" => Some("secret".to_string()),
        _ => None,
    });
    assert_eq!(config.storage.db_path, "/tmp/override.db");
    assert_eq!(config.services.token, "secret");
    assert!(config.services.cache_path.is_none());
}

#[test]
fn ingestion_year_filter_is_inclusive() {
    let config = IngestionConfig {
        min_year: Some(2000),
        max_year: Some(2010),
        ..Default::default()
    };
    assert!(config.accepts_year(2000));
    assert!(config.accepts_year(2010));
    assert!(!config.accepts_year(1999));
    assert!(!config.accepts_year(2011));
    assert!(IngestionConfig::default().accepts_year(1850));
}

#[test]
fn config_serde_roundtrip() {
    let config = ExpertiseConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = ExpertiseConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(roundtripped.retrieval.signals, config.retrieval.signals);
}
