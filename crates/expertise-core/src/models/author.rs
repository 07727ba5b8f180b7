use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AuthorId, DocumentId, EntityId};
use crate::errors::IngestionError;

/// Author metadata carried by every corpus record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub author_id: AuthorId,
    pub name: String,
    pub institution: String,
}

impl AuthorInfo {
    pub fn new(
        author_id: impl Into<String>,
        name: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            name: name.into(),
            institution: institution.into(),
        }
    }

    /// Every field is required; blank values count as missing.
    pub fn validate(&self) -> Result<(), IngestionError> {
        for (field, value) in [
            ("author_id", &self.author_id),
            ("name", &self.name),
            ("institution", &self.institution),
        ] {
            if value.trim().is_empty() {
                return Err(IngestionError::MissingAuthorField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Running statistics of one entity across one author's documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorEntityStat {
    /// Highest annotation confidence ever observed for this author/entity pair.
    pub max_score: f64,
    /// Number of the author's documents containing the entity.
    pub document_count: u32,
    /// Publication year of every such document. Duplicates are kept.
    pub years: Vec<i32>,
}

impl AuthorEntityStat {
    pub fn new(max_score: f64, year: i32) -> Self {
        Self {
            max_score,
            document_count: 1,
            years: vec![year],
        }
    }
}

/// An author record with its aggregated entity statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: AuthorId,
    pub name: String,
    pub institution: String,
    pub entities: BTreeMap<EntityId, AuthorEntityStat>,
    /// Documents ingested for this author, in ingestion order.
    pub document_ids: Vec<DocumentId>,
}

impl Author {
    /// An empty record for a first-seen author.
    pub fn new(info: &AuthorInfo) -> Self {
        Self {
            author_id: info.author_id.clone(),
            name: info.name.clone(),
            institution: info.institution.clone(),
            entities: BTreeMap::new(),
            document_ids: Vec::new(),
        }
    }

    pub fn info(&self) -> AuthorInfo {
        AuthorInfo::new(&self.author_id, &self.name, &self.institution)
    }

    pub fn document_count(&self) -> u64 {
        self.document_ids.len() as u64
    }

    /// Entities whose max score reaches `min_score`.
    pub fn entities_above(
        &self,
        min_score: f64,
    ) -> impl Iterator<Item = (&EntityId, &AuthorEntityStat)> {
        self.entities
            .iter()
            .filter(move |(_, stat)| stat.max_score >= min_score)
    }
}
