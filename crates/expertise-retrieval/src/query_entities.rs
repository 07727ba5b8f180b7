//! Query entity extraction from annotator output.

use std::collections::HashSet;

use expertise_core::models::{Annotation, QueryEntity};

/// Keep annotations at or above `min_score`, or all of them if none
/// qualifies; one entry per entity id, first-seen order.
pub fn extract_query_entities(annotations: &[Annotation], min_score: f64) -> Vec<QueryEntity> {
    let confident: Vec<&Annotation> = annotations.iter().filter(|a| a.score >= min_score).collect();
    let selected: Vec<&Annotation> = if confident.is_empty() {
        annotations.iter().collect()
    } else {
        confident
    };

    let mut seen = HashSet::new();
    selected
        .into_iter()
        .filter(|a| seen.insert(a.entity_id.as_str()))
        .map(|a| QueryEntity {
            entity_id: a.entity_id.clone(),
            entity_title: a.entity_title.clone(),
            score: a.score,
        })
        .collect()
}
