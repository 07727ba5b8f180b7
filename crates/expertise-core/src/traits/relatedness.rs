use crate::cancel::CancelToken;
use crate::errors::ExpertiseResult;
use crate::models::EntityId;

pub type EntityPair = (EntityId, EntityId);

/// Semantic relatedness between entities, in [0, 1].
pub trait IRelatednessProvider: Send + Sync {
    /// One value per pair, in input order.
    fn relatedness_batch(
        &self,
        pairs: &[EntityPair],
        cancel: &CancelToken,
    ) -> ExpertiseResult<Vec<f64>>;

    fn relatedness(&self, a: &str, b: &str, cancel: &CancelToken) -> ExpertiseResult<f64> {
        let values = self.relatedness_batch(&[(a.to_string(), b.to_string())], cancel)?;
        Ok(values.first().copied().unwrap_or(0.0))
    }
}
