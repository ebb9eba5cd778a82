//! Catalog-driven skill extraction over normalized tokens

use crate::processing::catalog::{normalize_variant, SkillCatalog, SkillEntry};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use strsim::jaro_winkler;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub canonical_name: String,
    pub category: String,
    /// Variant seen at the left-most match
    pub matched_variant: String,
    pub occurrence_count: usize,
}

pub struct SkillExtractor {
    catalog: Arc<SkillCatalog>,
}

const EXACT_MATCH_CONFIDENCE: f32 = 1.0;
const VARIANT_MATCH_CONFIDENCE: f32 = 0.98;

impl ExtractedSkill {
    /// 1.0 when the text used the canonical name itself, slightly less for an alias
    pub fn confidence(&self) -> f32 {
        if self.matched_variant == normalize_variant(&self.canonical_name) {
            EXACT_MATCH_CONFIDENCE
        } else {
            VARIANT_MATCH_CONFIDENCE
        }
    }
}

impl SkillExtractor {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self { catalog }
    }

    /// Scan tokens left to right, taking the longest variant window at each
    /// position. Matches never overlap. Output is sorted by canonical name.
    pub fn extract(&self, tokens: &[String]) -> Vec<ExtractedSkill> {
        let max_window = self.catalog.max_variant_tokens();
        let mut found: BTreeMap<String, ExtractedSkill> = BTreeMap::new();
        let mut position = 0;

        while position < tokens.len() {
            let longest = max_window.min(tokens.len() - position);
            let hit = (1..=longest).rev().find_map(|window| {
                let candidate = tokens[position..position + window].join(" ");
                self.catalog
                    .lookup(&candidate)
                    .map(|entry| (window, candidate, entry))
            });

            match hit {
                Some((window, variant, entry)) => {
                    found
                        .entry(entry.canonical_name.clone())
                        .and_modify(|skill| skill.occurrence_count += 1)
                        .or_insert_with(|| ExtractedSkill {
                            canonical_name: entry.canonical_name.clone(),
                            category: entry.category.clone(),
                            matched_variant: variant,
                            occurrence_count: 1,
                        });
                    position += window;
                }
                None => position += 1,
            }
        }

        debug!("Extracted {} distinct skills from {} tokens", found.len(), tokens.len());
        found.into_values().collect()
    }

    /// Tokens that look like a misspelling of one of the skill's variants
    pub fn similar_terms(&self, tokens: &[String], entry: &SkillEntry, threshold: f32) -> Vec<String> {
        let single_word: Vec<&str> = entry
            .variants
            .iter()
            .filter(|v| !v.contains(' ') && v.chars().count() >= 4)
            .map(|v| v.as_str())
            .collect();

        if single_word.is_empty() {
            return Vec::new();
        }

        let mut similar = BTreeSet::new();
        for token in tokens {
            if token.chars().count() < 4 || self.catalog.lookup(token).is_some() {
                continue;
            }
            let close = single_word
                .iter()
                .any(|variant| jaro_winkler(token, variant) as f32 >= threshold);
            if close {
                similar.insert(token.clone());
            }
        }

        similar.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn extractor() -> SkillExtractor {
        let catalog = SkillCatalog::from_entries(
            1,
            vec![
                SkillEntry::new("Machine Learning", "ml", &["machine learning"]),
                SkillEntry::new("Learning", "soft", &["learning"]),
                SkillEntry::new("AWS", "cloud", &["aws", "amazon web services"]),
                SkillEntry::new("Kubernetes", "devops", &["kubernetes", "k8s"]),
            ],
        )
        .unwrap();
        SkillExtractor::new(Arc::new(catalog))
    }

    #[test]
    fn test_longest_match_wins() {
        let skills = extractor().extract(&tokens(&["machine", "learning", "and", "learning"]));

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].canonical_name, "Learning");
        assert_eq!(skills[0].occurrence_count, 1);
        assert_eq!(skills[1].canonical_name, "Machine Learning");
        assert_eq!(skills[1].occurrence_count, 1);
    }

    #[test]
    fn test_occurrences_aggregate_across_variants() {
        let skills = extractor().extract(&tokens(&[
            "k8s", "cluster", "kubernetes", "amazon", "web", "services", "aws",
        ]));

        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].canonical_name, "AWS");
        assert_eq!(skills[0].matched_variant, "amazon web services");
        assert_eq!(skills[0].occurrence_count, 2);
        assert_eq!(skills[1].canonical_name, "Kubernetes");
        assert_eq!(skills[1].matched_variant, "k8s");
        assert_eq!(skills[1].occurrence_count, 2);
    }

    #[test]
    fn test_partial_multiword_falls_back() {
        let skills = extractor().extract(&tokens(&["amazon", "web", "aws"]));

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].matched_variant, "aws");
    }

    #[test]
    fn test_confidence_by_variant() {
        let skills = extractor().extract(&tokens(&["kubernetes", "amazon", "web", "services"]));

        assert_eq!(skills[0].canonical_name, "AWS");
        assert_eq!(skills[0].confidence(), 0.98);
        assert_eq!(skills[1].canonical_name, "Kubernetes");
        assert_eq!(skills[1].confidence(), 1.0);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = extractor();
        let input = tokens(&["aws", "machine", "learning", "k8s", "aws"]);

        assert_eq!(extractor.extract(&input), extractor.extract(&input));
    }

    #[test]
    fn test_empty_tokens() {
        assert!(extractor().extract(&[]).is_empty());
    }

    #[test]
    fn test_similar_terms() {
        let extractor = extractor();
        let entry = SkillEntry::new("Kubernetes", "devops", &["kubernetes", "k8s"]);
        let similar = extractor.similar_terms(&tokens(&["kubernets", "docker", "kubernetes"]), &entry, 0.88);

        assert_eq!(similar, vec!["kubernets".to_string()]);
    }
}
