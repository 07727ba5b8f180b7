//! Inverse author/document frequency.

use std::collections::HashMap;

use expertise_core::models::EntityId;

/// `ln(total / popularity)`; `None` when either count is zero.
pub fn inverse_frequency(total: u64, popularity: u64) -> Option<f64> {
    if total == 0 || popularity == 0 {
        return None;
    }
    Some((total as f64 / popularity as f64).ln())
}

/// IAF weight of every query entity:
/// `IAF(e) = (1 / |query_entities|) * ln(total / popularity(e))`.
///
/// Entities absent from `popularity` (never seen in the corpus) get no
/// weight, but still count in `|query_entities|`.
pub fn query_weights(
    query_entities: &[EntityId],
    popularity: &HashMap<EntityId, u64>,
    total: u64,
) -> HashMap<EntityId, f64> {
    if query_entities.is_empty() {
        return HashMap::new();
    }
    let share = 1.0 / query_entities.len() as f64;
    query_entities
        .iter()
        .filter_map(|entity| {
            let popularity = *popularity.get(entity)?;
            inverse_frequency(total, popularity).map(|iaf| (entity.clone(), share * iaf))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rare_entities_weigh_more() {
        let popularity = HashMap::from([("rare".to_string(), 1), ("common".to_string(), 50)]);
        let query = vec!["rare".to_string(), "common".to_string()];
        let weights = query_weights(&query, &popularity, 100);
        assert!(weights["rare"] > weights["common"]);
        assert!((weights["rare"] - 0.5 * 100f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn unknown_entities_get_no_weight() {
        let popularity = HashMap::from([("known".to_string(), 10)]);
        let query = vec!["known".to_string(), "unknown".to_string()];
        let weights = query_weights(&query, &popularity, 100);
        assert_eq!(weights.len(), 1);
        assert!((weights["known"] - 0.5 * 10f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_has_no_weights() {
        let popularity = HashMap::from([("e".to_string(), 0)]);
        assert!(query_weights(&["e".to_string()], &popularity, 0).is_empty());
        assert_eq!(inverse_frequency(10, 0), None);
    }
}
