//! Author profiles: an author's entities with per-year document counts.

use std::collections::BTreeMap;

use expertise_core::models::{Author, AuthorProfile, ProfileEntity};

/// Entities ordered by document count (most frequent first, then by id),
/// each with a year histogram.
pub fn build_profile(author: &Author) -> AuthorProfile {
    let mut entities: Vec<ProfileEntity> = author
        .entities
        .iter()
        .map(|(entity_id, stat)| {
            let mut per_year: BTreeMap<i32, u32> = BTreeMap::new();
            for year in &stat.years {
                *per_year.entry(*year).or_default() += 1;
            }
            ProfileEntity {
                entity_id: entity_id.clone(),
                document_count: stat.document_count,
                max_score: stat.max_score,
                years: per_year.into_iter().collect(),
            }
        })
        .collect();
    entities.sort_by(|a, b| {
        b.document_count
            .cmp(&a.document_count)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });

    AuthorProfile {
        author_id: author.author_id.clone(),
        name: author.name.clone(),
        institution: author.institution.clone(),
        document_count: author.document_count(),
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expertise_core::models::{AuthorEntityStat, AuthorInfo};

    #[test]
    fn most_frequent_entities_first_with_year_histogram() {
        let mut author = Author::new(&AuthorInfo::new("a1", "Ada", "Uni"));
        author.entities.insert(
            "Rare".into(),
            AuthorEntityStat {
                max_score: 0.9,
                document_count: 1,
                years: vec![2015],
            },
        );
        author.entities.insert(
            "Common".into(),
            AuthorEntityStat {
                max_score: 0.4,
                document_count: 3,
                years: vec![2012, 2010, 2012],
            },
        );
        author.document_ids = vec![1, 2, 3, 4];

        let profile = build_profile(&author);
        assert_eq!(profile.document_count, 4);
        assert_eq!(profile.entities[0].entity_id, "Common");
        assert_eq!(profile.entities[0].years, vec![(2010, 1), (2012, 2)]);
        assert_eq!(profile.entities[1].entity_id, "Rare");
    }
}
