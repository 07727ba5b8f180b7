//! Term-signal scoring over an author's full-text hits.

use expertise_core::models::TermAuthorHits;

/// Best document score of the author; 0 without hits.
pub fn term_max(hits: &TermAuthorHits) -> f64 {
    hits.scores.values().copied().fold(None, |best: Option<f64>, s| {
        Some(best.map_or(s, |b| b.max(s)))
    })
    .unwrap_or(0.0)
}

/// Mean document score of the author; 0 without hits.
pub fn term_mean(hits: &TermAuthorHits) -> f64 {
    if hits.scores.is_empty() {
        return 0.0;
    }
    hits.scores.values().sum::<f64>() / hits.scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(scores: &[(i64, f64)]) -> TermAuthorHits {
        let mut hits = TermAuthorHits::new("a1", "Ada");
        for (doc, score) in scores {
            hits.documents.insert(*doc, 2010);
            hits.scores.insert(*doc, *score);
        }
        hits
    }

    #[test]
    fn max_and_mean() {
        let h = hits(&[(1, 2.0), (2, 6.0), (3, 1.0)]);
        assert_eq!(term_max(&h), 6.0);
        assert_eq!(term_mean(&h), 3.0);
    }

    #[test]
    fn empty_hits_score_zero() {
        let h = hits(&[]);
        assert_eq!(term_max(&h), 0.0);
        assert_eq!(term_mean(&h), 0.0);
    }

    #[test]
    fn negative_scores_keep_their_max() {
        let h = hits(&[(1, -3.0), (2, -1.0)]);
        assert_eq!(term_max(&h), -1.0);
    }
}
