//! Presentation-ready report built on top of the analysis result

use crate::processing::analyzer::AnalysisReport;
use crate::processing::gap_analyzer::{Gap, GapKind, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_RECOMMENDATIONS: usize = 5;
const MAX_LISTED_SKILLS: usize = 3;

/// Analysis plus summary, recommendations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    pub summary: ReportSummary,
    pub recommendations: Vec<Recommendation>,
    pub metadata: ReportMetadata,
    pub analysis: AnalysisReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Text similarity as a percentage (0-100)
    pub similarity_percentage: u8,

    /// Share of required skills found in the resume (0-100)
    pub skill_match_percentage: u8,

    /// Extraction confidence over the matched skills (0-100)
    pub match_confidence_percentage: u8,

    /// One-line verdict
    pub verdict: String,

    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub catalog_version: u32,
    pub resume_source: Option<String>,
    pub job_source: Option<String>,
}

fn percentage(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn list_skills<'a>(gaps: impl Iterator<Item = &'a Gap>) -> Vec<String> {
    gaps.take(MAX_LISTED_SKILLS)
        .map(|g| g.skill.canonical_name.clone())
        .collect()
}

impl GapReport {
    /// `low_coverage_cutoff` marks categories worth a dedicated recommendation
    pub fn new(
        analysis: AnalysisReport,
        resume_source: Option<String>,
        job_source: Option<String>,
        low_coverage_cutoff: f32,
    ) -> Self {
        let summary = Self::build_summary(&analysis);
        let recommendations = Self::build_recommendations(&analysis, low_coverage_cutoff);

        Self {
            summary,
            recommendations,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                catalog_version: analysis.catalog_version,
                resume_source,
                job_source,
            },
            analysis,
        }
    }

    fn build_summary(analysis: &AnalysisReport) -> ReportSummary {
        let mut strengths: Vec<String> = analysis
            .matched_skills
            .iter()
            .map(|s| s.canonical_name.clone())
            .collect();
        strengths.extend(
            analysis
                .category_coverage
                .iter()
                .filter(|c| c.required_count > 0 && c.matched_count >= c.required_count)
                .map(|c| format!("Full coverage of {} skills", c.category)),
        );

        let improvement_areas = analysis
            .gaps
            .iter()
            .filter(|g| g.priority != Priority::Minor)
            .map(|g| format!("{} ({}, {})", g.skill.canonical_name, g.skill.category, g.kind))
            .collect();

        ReportSummary {
            similarity_percentage: percentage(analysis.similarity.score),
            skill_match_percentage: percentage(analysis.skill_match_score),
            match_confidence_percentage: percentage(analysis.match_confidence),
            verdict: analysis.similarity.interpretation.clone(),
            strengths,
            improvement_areas,
        }
    }

    fn build_recommendations(analysis: &AnalysisReport, low_coverage_cutoff: f32) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        let critical = list_skills(analysis.gaps.iter().filter(|g| g.priority == Priority::Critical));
        if let Some(first) = critical.first() {
            recommendations.push(Recommendation {
                priority: Priority::Critical,
                title: "Add Critical Skills".to_string(),
                description: format!("Missing essential skills: {}", critical.join(", ")),
                action: format!("Gain hands-on experience with {}", first),
            });
        }

        let moderate = list_skills(analysis.gaps.iter().filter(|g| {
            g.priority == Priority::Moderate && g.kind == GapKind::Missing
        }));
        if let Some(first) = moderate.first() {
            recommendations.push(Recommendation {
                priority: Priority::Moderate,
                title: "Strengthen Core Skills".to_string(),
                description: format!("Important skills missing: {}", moderate.join(", ")),
                action: format!("Build a project using {}", first),
            });
        }

        let weak = list_skills(analysis.gaps.iter().filter(|g| g.kind != GapKind::Missing));
        if !weak.is_empty() {
            recommendations.push(Recommendation {
                priority: Priority::Moderate,
                title: "Strengthen Weak Matches".to_string(),
                description: format!("The job stresses these more than your resume: {}", weak.join(", ")),
                action: "Add concrete examples and metrics".to_string(),
            });
        }

        if let Some(low) = analysis
            .category_coverage
            .iter()
            .find(|c| c.required_count > 0 && c.ratio < low_coverage_cutoff)
        {
            recommendations.push(Recommendation {
                priority: Priority::Minor,
                title: "Improve Category Coverage".to_string(),
                description: format!(
                    "Low coverage in {} ({} of {} required skills)",
                    low.category, low.matched_count, low.required_count
                ),
                action: format!("Focus learning on {} technologies", low.category),
            });
        }

        let near_misses: Vec<&Gap> = analysis
            .gaps
            .iter()
            .filter(|g| !g.similar_terms.is_empty())
            .collect();
        if let Some(gap) = near_misses.first() {
            recommendations.push(Recommendation {
                priority: Priority::Minor,
                title: "Check Spelling of Skills".to_string(),
                description: format!(
                    "'{}' looks like {} but was not recognized",
                    gap.similar_terms.join("', '"),
                    gap.skill.canonical_name
                ),
                action: format!("Spell it as '{}'", gap.skill.canonical_name),
            });
        }

        recommendations.truncate(MAX_RECOMMENDATIONS);
        recommendations
    }
}
