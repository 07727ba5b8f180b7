use crate::errors::ExpertiseResult;
use crate::models::TermHit;

/// Term-based search over document bodies.
pub trait IFullTextSearch: Send + Sync {
    /// At most `top_k` hits, best first.
    fn search(&self, query: &str, top_k: usize) -> ExpertiseResult<Vec<TermHit>>;
}
