use expertise_core::errors::*;

#[test]
fn author_not_found_carries_id() {
    let err = ExpertiseError::AuthorNotFound {
        author_id: "a-42".into(),
    };
    assert!(err.to_string().contains("a-42"));
}

#[test]
fn cancelled_carries_stage() {
    let err = ExpertiseError::Cancelled {
        stage: "scoring".into(),
    };
    assert!(err.to_string().contains("scoring"));
}

#[test]
fn storage_error_converts_to_expertise_error() {
    let storage_err = StorageError::SqliteError {
        message: "disk full".into(),
    };
    let err: ExpertiseError = storage_err.into();
    assert!(matches!(err, ExpertiseError::StorageError(_)));
    assert!(err.to_string().contains("disk full"));
    assert!(!err.is_service_failure());
}

#[test]
fn service_error_is_a_service_failure() {
    let err: ExpertiseError = ServiceError::RetriesExhausted {
        service: "annotator".into(),
        attempts: 4,
        last_error: "connection refused".into(),
    }
    .into();
    assert!(err.is_service_failure());
    let msg = err.to_string();
    assert!(msg.contains("annotator"));
    assert!(msg.contains('4'));
}

#[test]
fn ingestion_error_names_missing_field() {
    let err: ExpertiseError = IngestionError::MissingAuthorField {
        field: "institution".into(),
    }
    .into();
    assert!(matches!(err, ExpertiseError::IngestionError(_)));
    assert!(err.to_string().contains("institution"));
}

#[test]
fn scoring_error_names_unknown_function() {
    let err: ExpertiseError = ScoringError::UnknownScoringFunction {
        name: "bm99".into(),
    }
    .into();
    assert!(err.to_string().contains("bm99"));
}

#[test]
fn serde_json_error_converts() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: ExpertiseError = json_err.into();
    assert!(matches!(err, ExpertiseError::SerializationError(_)));
}
