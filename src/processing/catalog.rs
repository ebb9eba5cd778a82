//! Skill catalog: canonical skills, their categories and accepted variants

use crate::config::CatalogConfig;
use crate::error::{Result, ResumeGapError};
use crate::processing::text_processor::is_token_char;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/default_skills.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub canonical_name: String,
    pub category: String,
    pub variants: BTreeSet<String>,
    /// Relative importance of the skill, 1.0 is neutral
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    #[serde(default)]
    categories: BTreeMap<String, f32>,
    #[serde(default)]
    skills: Vec<SkillDefinition>,
}

#[derive(Debug, Deserialize)]
struct SkillDefinition {
    name: String,
    category: String,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default)]
    variants: Vec<String>,
}

fn default_weight() -> f32 {
    1.0
}

fn valid_weight(weight: f32) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Validated, read-only skill catalog
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    version: u32,
    skills: Vec<SkillEntry>,
    variant_index: HashMap<String, SkillEntry>,
    protected_terms: HashSet<String>,
    max_variant_tokens: usize,
    category_weights: BTreeMap<String, f32>,
}

impl SkillEntry {
    pub fn new(canonical_name: &str, category: &str, variants: &[&str]) -> Self {
        Self {
            canonical_name: canonical_name.trim().to_string(),
            category: normalize_variant(category),
            variants: variants.iter().map(|v| normalize_variant(v)).collect(),
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Lowercase and collapse whitespace so variants line up with normalizer output
pub fn normalize_variant(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl SkillCatalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Load the catalog named by configuration, falling back to the built-in one
    pub fn load(config: &CatalogConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeGapError::CatalogLoad(format!("Failed to read catalog '{}': {}", path.display(), e))
        })?;
        info!("Loading skill catalog from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| ResumeGapError::CatalogLoad(format!("Failed to parse catalog: {}", e)))?;

        if file.version == 0 {
            return Err(ResumeGapError::CatalogLoad(
                "Catalog version must be at least 1".to_string(),
            ));
        }

        let entries = file
            .skills
            .into_iter()
            .map(|def| SkillEntry {
                canonical_name: def.name.trim().to_string(),
                category: normalize_variant(&def.category),
                variants: def.variants.iter().map(|v| normalize_variant(v)).collect(),
                weight: def.weight,
            })
            .collect();

        let category_weights = file
            .categories
            .into_iter()
            .map(|(category, weight)| (normalize_variant(&category), weight))
            .collect();

        Self::from_entries(file.version, entries)?.with_category_weights(category_weights)
    }

    /// Validate entries and build the variant index.
    ///
    /// Entries are checked in order, so an overlapping variant is reported
    /// against the skill that claimed it first.
    pub fn from_entries(version: u32, entries: Vec<SkillEntry>) -> Result<Self> {
        let mut variant_index: HashMap<String, SkillEntry> = HashMap::new();
        let mut seen_names: HashMap<String, String> = HashMap::new();
        let mut protected_terms = HashSet::new();
        let mut max_variant_tokens = 0;

        for entry in &entries {
            if entry.canonical_name.is_empty() {
                return Err(ResumeGapError::CatalogLoad(
                    "Skill with an empty name".to_string(),
                ));
            }
            if entry.category.is_empty() {
                return Err(ResumeGapError::CatalogLoad(format!(
                    "Skill '{}' has no category",
                    entry.canonical_name
                )));
            }
            if !valid_weight(entry.weight) {
                return Err(ResumeGapError::CatalogLoad(format!(
                    "Skill '{}' has weight {}, expected a positive number",
                    entry.canonical_name, entry.weight
                )));
            }
            if entry.variants.is_empty() || entry.variants.iter().any(|v| v.is_empty()) {
                return Err(ResumeGapError::CatalogLoad(format!(
                    "Skill '{}' needs at least one non-empty variant",
                    entry.canonical_name
                )));
            }

            let name_key = entry.canonical_name.to_lowercase();
            if let Some(previous) = seen_names.insert(name_key, entry.canonical_name.clone()) {
                return Err(ResumeGapError::CatalogLoad(format!(
                    "Duplicate skill name '{}' (already defined as '{}')",
                    entry.canonical_name, previous
                )));
            }

            for variant in &entry.variants {
                if let Some(bad) = variant
                    .split(' ')
                    .find(|word| !word.chars().all(is_token_char))
                {
                    return Err(ResumeGapError::CatalogLoad(format!(
                        "Variant '{}' of '{}' contains '{}', which text normalization splits apart",
                        variant, entry.canonical_name, bad
                    )));
                }

                if let Some(existing) = variant_index.get(variant) {
                    return Err(ResumeGapError::CatalogIntegrity {
                        variant: variant.clone(),
                        first: existing.canonical_name.clone(),
                        second: entry.canonical_name.clone(),
                    });
                }

                let words: Vec<&str> = variant.split(' ').collect();
                max_variant_tokens = max_variant_tokens.max(words.len());
                protected_terms.extend(words.iter().map(|w| w.to_string()));
                variant_index.insert(variant.clone(), entry.clone());
            }
        }

        let mut skills = entries;
        skills.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));

        info!(
            "Skill catalog v{} ready: {} skills, {} variants",
            version,
            skills.len(),
            variant_index.len()
        );
        debug!("Longest variant spans {} tokens", max_variant_tokens);

        Ok(Self {
            version,
            skills,
            variant_index,
            protected_terms,
            max_variant_tokens,
            category_weights: BTreeMap::new(),
        })
    }

    /// Attach per-category multipliers. Categories left out weigh 1.0.
    pub fn with_category_weights(mut self, weights: BTreeMap<String, f32>) -> Result<Self> {
        if let Some((category, weight)) = weights.iter().find(|(_, w)| !valid_weight(**w)) {
            return Err(ResumeGapError::CatalogLoad(format!(
                "Category '{}' has weight {}, expected a positive number",
                category, weight
            )));
        }
        self.category_weights = weights;
        Ok(self)
    }

    /// Mapping from normalized variant to the skill it denotes
    pub fn lookup_variants(&self) -> &HashMap<String, SkillEntry> {
        &self.variant_index
    }

    pub fn lookup(&self, variant: &str) -> Option<&SkillEntry> {
        self.variant_index.get(variant)
    }

    /// Find a skill by canonical name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&SkillEntry> {
        let wanted = name.trim().to_lowercase();
        self.skills
            .iter()
            .find(|s| s.canonical_name.to_lowercase() == wanted)
    }

    /// All skills sorted by canonical name
    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.skills.iter().map(|s| s.category.as_str()).collect()
    }

    /// Every word that appears in some variant
    pub fn protected_terms(&self) -> &HashSet<String> {
        &self.protected_terms
    }

    pub fn category_weight(&self, category: &str) -> f32 {
        self.category_weights.get(category).copied().unwrap_or(1.0)
    }

    pub fn category_weights(&self) -> &BTreeMap<String, f32> {
        &self.category_weights
    }

    pub fn max_variant_tokens(&self) -> usize {
        self.max_variant_tokens
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
