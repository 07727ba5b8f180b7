//! Client for a TagMe-compatible service: `/tag` annotates text with
//! Wikipedia entities, `/rel` scores title pairs.

use serde::Deserialize;
use tracing::debug;

use expertise_core::config::ServicesConfig;
use expertise_core::constants::MAX_RELATEDNESS_BATCH;
use expertise_core::errors::{ExpertiseError, ExpertiseResult, ServiceError};
use expertise_core::models::Annotation;
use expertise_core::traits::{EntityPair, IEntityAnnotator, IRelatednessProvider};
use expertise_core::CancelToken;

use crate::http::HttpClient;

const ANNOTATOR: &str = "annotator";
const RELATEDNESS: &str = "relatedness";

#[derive(Debug, Deserialize)]
pub(crate) struct TagResponse {
    #[serde(default)]
    pub annotations: Vec<TagAnnotation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagAnnotation {
    /// Absent when the service could not disambiguate the spot.
    pub title: Option<String>,
    pub rho: f64,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelResponse {
    #[serde(default)]
    pub result: Vec<RelResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelResult {
    pub couple: String,
    #[serde(default)]
    pub rel: Option<f64>,
    #[serde(default)]
    pub err: Option<String>,
}

/// Entities are keyed by their Wikipedia title, as the relatedness endpoint expects.
pub(crate) fn to_annotations(response: TagResponse) -> Vec<Annotation> {
    response
        .annotations
        .into_iter()
        .filter_map(|a| {
            let title = a.title?;
            Some(Annotation {
                entity_id: title.clone(),
                entity_title: title,
                score: a.rho,
                span: (a.start, a.end),
            })
        })
        .collect()
}

/// Wire form of a pair: titles with spaces as underscores, separated by one space.
pub(crate) fn couple(a: &str, b: &str) -> String {
    format!("{} {}", a.replace(' ', "_"), b.replace(' ', "_"))
}

/// Match results to requested pairs by couple string, in request order.
pub(crate) fn to_relatedness(
    pairs: &[EntityPair],
    response: RelResponse,
) -> ExpertiseResult<Vec<f64>> {
    let mut by_couple = std::collections::HashMap::with_capacity(response.result.len());
    for result in response.result {
        if let Some(err) = &result.err {
            debug!(couple = %result.couple, error = %err, "relatedness pair rejected");
        }
        by_couple.insert(result.couple, result.rel.unwrap_or(0.0));
    }
    pairs
        .iter()
        .map(|(a, b)| {
            by_couple.get(&couple(a, b)).copied().ok_or_else(|| {
                ExpertiseError::from(ServiceError::InvalidResponse {
                    service: RELATEDNESS.to_string(),
                    reason: format!("no result for pair ({a}, {b})"),
                })
            })
        })
        .collect()
}

pub struct TagmeClient {
    http: HttpClient,
    token: String,
    lang: String,
}

impl TagmeClient {
    pub fn new(config: &ServicesConfig) -> ExpertiseResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            token: config.token.clone(),
            lang: config.lang.clone(),
        })
    }
}

impl IEntityAnnotator for TagmeClient {
    fn annotate(&self, text: &str, cancel: &CancelToken) -> ExpertiseResult<Vec<Annotation>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let form = [
            ("text", text.to_string()),
            ("lang", self.lang.clone()),
            ("gcube-token", self.token.clone()),
        ];
        let response: TagResponse = self.http.post_form_json(ANNOTATOR, "/tag", &form, cancel)?;
        let annotations = to_annotations(response);
        debug!(chars = text.len(), annotations = annotations.len(), "text annotated");
        Ok(annotations)
    }
}

impl IRelatednessProvider for TagmeClient {
    fn relatedness_batch(
        &self,
        pairs: &[EntityPair],
        cancel: &CancelToken,
    ) -> ExpertiseResult<Vec<f64>> {
        let mut values = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(MAX_RELATEDNESS_BATCH) {
            let mut query: Vec<(&str, String)> =
                chunk.iter().map(|(a, b)| ("tt", couple(a, b))).collect();
            query.push(("lang", self.lang.clone()));
            query.push(("gcube-token", self.token.clone()));
            let response: RelResponse = self.http.get_json(RELATEDNESS, "/rel", &query, cancel)?;
            values.extend(to_relatedness(chunk, response)?);
        }
        debug!(pairs = pairs.len(), "relatedness fetched");
        Ok(values)
    }
}
