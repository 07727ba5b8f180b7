use crate::cancel::CancelToken;
use crate::errors::ExpertiseResult;
use crate::models::Annotation;

/// Named-entity annotation of free text.
pub trait IEntityAnnotator: Send + Sync {
    fn annotate(&self, text: &str, cancel: &CancelToken) -> ExpertiseResult<Vec<Annotation>>;
}
