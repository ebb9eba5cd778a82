//! Skill gap analysis: what the job asks for that the resume lacks or underplays

use crate::config::AnalysisConfig;
use crate::processing::catalog::{SkillCatalog, SkillEntry};
use crate::processing::skill_extractor::ExtractedSkill;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Gap priority. The derived ordering puts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    /// Required by the job, absent from the resume
    Missing,
    /// Present in both, but the job mentions it at least `emphasis_ratio` times as often
    Weak,
    /// Present in both, job emphasis between `minor_emphasis_ratio` and `emphasis_ratio`
    Underrepresented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub skill: SkillEntry,
    pub kind: GapKind,
    pub priority: Priority,
    pub reason: String,
    pub resume_count: usize,
    pub job_count: usize,
    /// Skill weight times category weight, scaled into 0..=1
    pub impact: f32,
    /// Resume words that look like a misspelling of a missing skill
    pub similar_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCoverage {
    pub category: String,
    pub required_count: usize,
    pub matched_count: usize,
    pub ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapThresholds {
    pub emphasis_ratio: f32,
    pub minor_emphasis_ratio: f32,
    pub critical_coverage: f32,
}

const IMPACT_SCALE: f32 = 1.5;

pub struct GapAnalyzer {
    catalog: Arc<SkillCatalog>,
    thresholds: GapThresholds,
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for GapThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            emphasis_ratio: config.emphasis_ratio,
            minor_emphasis_ratio: config.minor_emphasis_ratio,
            critical_coverage: config.critical_coverage,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::Moderate => write!(f, "Moderate"),
            Priority::Minor => write!(f, "Minor"),
        }
    }
}

impl std::fmt::Display for GapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapKind::Missing => write!(f, "missing"),
            GapKind::Weak => write!(f, "weak"),
            GapKind::Underrepresented => write!(f, "underrepresented"),
        }
    }
}

impl CategoryCoverage {
    /// A category nothing is required from is vacuously covered
    pub fn new(category: &str, required_count: usize, matched_count: usize) -> Self {
        let ratio = if required_count == 0 {
            1.0
        } else {
            (matched_count.min(required_count) as f32) / required_count as f32
        };

        Self {
            category: category.to_string(),
            required_count,
            matched_count,
            ratio,
        }
    }
}

impl GapAnalyzer {
    pub fn new(catalog: Arc<SkillCatalog>, thresholds: GapThresholds) -> Self {
        Self { catalog, thresholds }
    }

    /// Diff job skills against resume skills.
    ///
    /// Gaps come back sorted by priority, then canonical name. Coverage has one
    /// entry per category seen in either skill set, sorted by category, and is
    /// empty when the job names no skills.
    pub fn analyze(
        &self,
        resume_skills: &[ExtractedSkill],
        job_skills: &[ExtractedSkill],
    ) -> (Vec<Gap>, Vec<CategoryCoverage>) {
        if job_skills.is_empty() {
            debug!("Job description names no catalog skills; nothing to diff");
            return (Vec::new(), Vec::new());
        }

        let resume: BTreeMap<&str, &ExtractedSkill> = resume_skills
            .iter()
            .map(|s| (s.canonical_name.as_str(), s))
            .collect();
        let job: BTreeMap<&str, &ExtractedSkill> = job_skills
            .iter()
            .map(|s| (s.canonical_name.as_str(), s))
            .collect();

        let coverage = Self::category_coverage(&resume, &job);
        let ratio_by_category: BTreeMap<&str, f32> = coverage
            .iter()
            .map(|c| (c.category.as_str(), c.ratio))
            .collect();

        let mut gaps: Vec<Gap> = job
            .values()
            .filter_map(|required| {
                let category_ratio = ratio_by_category
                    .get(required.category.as_str())
                    .copied()
                    .unwrap_or(1.0);
                self.classify(required, resume.get(required.canonical_name.as_str()).copied(), category_ratio)
            })
            .collect();

        gaps.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.skill.canonical_name.cmp(&b.skill.canonical_name))
        });

        debug!(
            "Gap analysis: {} required skills, {} gaps, {} categories",
            job.len(),
            gaps.len(),
            coverage.len()
        );

        (gaps, coverage)
    }

    fn category_coverage(
        resume: &BTreeMap<&str, &ExtractedSkill>,
        job: &BTreeMap<&str, &ExtractedSkill>,
    ) -> Vec<CategoryCoverage> {
        let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

        for required in job.values() {
            let tally = tallies.entry(required.category.as_str()).or_insert((0, 0));
            tally.0 += 1;
            if resume.contains_key(required.canonical_name.as_str()) {
                tally.1 += 1;
            }
        }
        for present in resume.values() {
            tallies.entry(present.category.as_str()).or_insert((0, 0));
        }

        tallies
            .into_iter()
            .map(|(category, (required, matched))| CategoryCoverage::new(category, required, matched))
            .collect()
    }

    fn classify(
        &self,
        required: &ExtractedSkill,
        present: Option<&ExtractedSkill>,
        category_ratio: f32,
    ) -> Option<Gap> {
        let job_count = required.occurrence_count;

        let (kind, priority, reason, resume_count) = match present {
            None => {
                let priority = if category_ratio < self.thresholds.critical_coverage {
                    Priority::Critical
                } else {
                    Priority::Moderate
                };
                let reason = format!(
                    "Required by the job but not found in the resume ({} coverage {:.0}%)",
                    required.category,
                    category_ratio * 100.0
                );
                (GapKind::Missing, priority, reason, 0)
            }
            Some(found) => {
                let resume_count = found.occurrence_count.max(1);
                let emphasis = job_count as f32 / resume_count as f32;

                if emphasis >= self.thresholds.emphasis_ratio {
                    let reason = format!(
                        "Job mentions it {} times but the resume only {} ({:.1}x emphasis)",
                        job_count, found.occurrence_count, emphasis
                    );
                    (GapKind::Weak, Priority::Moderate, reason, found.occurrence_count)
                } else if emphasis >= self.thresholds.minor_emphasis_ratio {
                    let reason = format!(
                        "Job mentions it {} times, the resume {} ({:.1}x emphasis)",
                        job_count, found.occurrence_count, emphasis
                    );
                    (GapKind::Underrepresented, Priority::Minor, reason, found.occurrence_count)
                } else {
                    return None;
                }
            }
        };

        let skill = self.entry_for(required);
        let impact = impact_score(skill.weight, self.catalog.category_weight(&skill.category));

        Some(Gap {
            skill,
            impact,
            kind,
            priority,
            reason,
            resume_count,
            job_count,
            similar_terms: Vec::new(),
        })
    }

    fn entry_for(&self, skill: &ExtractedSkill) -> SkillEntry {
        self.catalog
            .get(&skill.canonical_name)
            .cloned()
            .unwrap_or_else(|| SkillEntry {
                canonical_name: skill.canonical_name.clone(),
                category: skill.category.clone(),
                variants: BTreeSet::from([skill.matched_variant.clone()]),
                weight: 1.0,
            })
    }
}

/// How much closing a gap matters. Informational only, priority ignores it.
pub fn impact_score(skill_weight: f32, category_weight: f32) -> f32 {
    (skill_weight * category_weight / IMPACT_SCALE).min(1.0)
}

/// Weight-averaged extraction confidence of the job skills the resume covers.
/// 0.0 when nothing matches.
pub fn match_confidence(
    catalog: &SkillCatalog,
    resume_skills: &[ExtractedSkill],
    job_skills: &[ExtractedSkill],
) -> f32 {
    let required: BTreeSet<&str> = job_skills.iter().map(|s| s.canonical_name.as_str()).collect();

    let (weighted, total) = resume_skills
        .iter()
        .filter(|s| required.contains(s.canonical_name.as_str()))
        .fold((0.0f32, 0.0f32), |(weighted, total), s| {
            let weight = catalog.get(&s.canonical_name).map(|e| e.weight).unwrap_or(1.0);
            (weighted + s.confidence() * weight, total + weight)
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Fraction of job-required skills that the resume mentions at all
pub fn skill_match_score(resume_skills: &[ExtractedSkill], job_skills: &[ExtractedSkill]) -> f32 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let present: BTreeSet<&str> = resume_skills.iter().map(|s| s.canonical_name.as_str()).collect();
    let matched = job_skills
        .iter()
        .filter(|s| present.contains(s.canonical_name.as_str()))
        .count();
    matched as f32 / job_skills.len() as f32
}
