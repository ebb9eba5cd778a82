//! Analysis pipeline: normalize, score, extract, diff

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::processing::catalog::SkillCatalog;
use crate::processing::document::{Document, DocumentStats, DocumentType};
use crate::processing::gap_analyzer::{match_confidence, skill_match_score, CategoryCoverage, Gap, GapAnalyzer, GapKind, GapThresholds};
use crate::processing::similarity::{SimilarityResult, SimilarityScorer};
use crate::processing::skill_extractor::{ExtractedSkill, SkillExtractor};
use crate::processing::text_processor::Normalizer;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Result of one resume/job comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub similarity: SimilarityResult,

    /// Skills found in each document, sorted by canonical name
    pub resume_skills: Vec<ExtractedSkill>,
    pub job_skills: Vec<ExtractedSkill>,

    /// Job skills the resume also mentions
    pub matched_skills: Vec<ExtractedSkill>,

    /// Sorted by priority, then canonical name
    pub gaps: Vec<Gap>,
    pub category_coverage: Vec<CategoryCoverage>,

    /// Share of job-required skills present in the resume
    pub skill_match_score: f32,
    /// Weight-averaged extraction confidence over the matched skills
    pub match_confidence: f32,

    pub resume_stats: DocumentStats,
    pub job_stats: DocumentStats,
    pub catalog_version: u32,
}

/// Stateless pipeline; safe to share between threads
pub struct Pipeline {
    catalog: Arc<SkillCatalog>,
    normalizer: Normalizer,
    extractor: SkillExtractor,
    scorer: SimilarityScorer,
    gap_analyzer: GapAnalyzer,
    fuzzy_threshold: f32,
}

impl AnalysisReport {
    pub fn gaps_of_kind(&self, kind: GapKind) -> impl Iterator<Item = &Gap> {
        self.gaps.iter().filter(move |g| g.kind == kind)
    }
}

impl Pipeline {
    pub fn new(catalog: Arc<SkillCatalog>, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            normalizer: Normalizer::new(&catalog),
            extractor: SkillExtractor::new(Arc::clone(&catalog)),
            scorer: SimilarityScorer::new(config.top_terms, config.max_ngram),
            gap_analyzer: GapAnalyzer::new(Arc::clone(&catalog), GapThresholds::from(config)),
            fuzzy_threshold: config.fuzzy_threshold,
            catalog,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Run a full analysis. Either the whole report is produced or an error is returned.
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        info!("Starting skill gap analysis");

        let resume = Document::new(resume_text.to_string(), DocumentType::Resume, &self.normalizer)?;
        let job = Document::new(job_text.to_string(), DocumentType::JobDescription, &self.normalizer)?;
        debug!(
            "Normalized resume to {} tokens, job description to {} tokens",
            resume.tokens().len(),
            job.tokens().len()
        );

        let similarity = self.scorer.score(resume.tokens(), job.tokens())?;

        let resume_skills = self.extractor.extract(resume.tokens());
        let job_skills = self.extractor.extract(job.tokens());

        let (mut gaps, category_coverage) = self.gap_analyzer.analyze(&resume_skills, &job_skills);
        for gap in gaps.iter_mut().filter(|g| g.kind == GapKind::Missing) {
            gap.similar_terms = self
                .extractor
                .similar_terms(resume.tokens(), &gap.skill, self.fuzzy_threshold);
        }

        let present: BTreeSet<&str> = resume_skills.iter().map(|s| s.canonical_name.as_str()).collect();
        let matched_skills: Vec<ExtractedSkill> = job_skills
            .iter()
            .filter(|s| present.contains(s.canonical_name.as_str()))
            .cloned()
            .collect();

        let report = AnalysisReport {
            skill_match_score: skill_match_score(&resume_skills, &job_skills),
            match_confidence: match_confidence(&self.catalog, &resume_skills, &job_skills),
            similarity,
            matched_skills,
            gaps,
            category_coverage,
            resume_stats: resume.stats().clone(),
            job_stats: job.stats().clone(),
            catalog_version: self.catalog.version(),
            resume_skills,
            job_skills,
        };

        info!(
            "Analysis finished in {}ms: similarity {:.1}%, {} gaps",
            start_time.elapsed().as_millis(),
            report.similarity.score * 100.0,
            report.gaps.len()
        );

        Ok(report)
    }
}
