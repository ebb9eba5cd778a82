//! TF-IDF vectorization and cosine similarity between resume and job text
//!
//! The corpus is always exactly two documents, so plain IDF would zero out
//! every shared term. Weights use the smoothed form instead:
//!
//! ```text
//! tf(t, d)  = 1 + ln(count of t in d)
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1      with N = 2
//! w(t, d)   = tf(t, d) * idf(t)
//! ```
//!
//! A term present in both documents therefore has idf 1.0, a term present in
//! only one has idf `1 + ln(1.5)`. Terms are runs of 1 to `max_ngram`
//! consecutive tokens joined by a space.

use crate::error::{Result, ResumeGapError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const METHOD_TFIDF_COSINE: &str = "tfidf-cosine";
const CORPUS_SIZE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Cosine similarity in [0, 1]
    pub score: f32,
    pub method: String,
    pub interpretation: String,
    pub top_matching_terms: Vec<TermWeight>,
    pub resume_unique_terms: Vec<String>,
    pub job_unique_terms: Vec<String>,
    pub jaccard_similarity: f32,
    /// Fraction of job terms that also appear in the resume
    pub term_coverage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

pub struct SimilarityScorer {
    top_terms: usize,
    max_ngram: usize,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(10, 3)
    }
}

/// Smoothed inverse document frequency for a two-document corpus
pub fn smoothed_idf(document_frequency: usize) -> f64 {
    ((1.0 + CORPUS_SIZE) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Sublinear term frequency
pub fn sublinear_tf(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        1.0 + (count as f64).ln()
    }
}

pub fn interpret_score(score: f32) -> &'static str {
    if score >= 0.75 {
        "Strong match"
    } else if score >= 0.60 {
        "Good match"
    } else if score >= 0.45 {
        "Moderate match"
    } else if score >= 0.30 {
        "Weak match"
    } else {
        "Poor match"
    }
}

fn term_counts(tokens: &[String], max_ngram: usize) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for n in 1..=max_ngram.max(1) {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

impl SimilarityScorer {
    pub fn new(top_terms: usize, max_ngram: usize) -> Self {
        Self {
            top_terms,
            max_ngram: max_ngram.max(1),
        }
    }

    pub fn score(&self, resume_tokens: &[String], job_tokens: &[String]) -> Result<SimilarityResult> {
        if resume_tokens.is_empty() {
            return Err(ResumeGapError::InsufficientText("resume".to_string()));
        }
        if job_tokens.is_empty() {
            return Err(ResumeGapError::InsufficientText("job description".to_string()));
        }

        let resume_counts = term_counts(resume_tokens, self.max_ngram);
        let job_counts = term_counts(job_tokens, self.max_ngram);

        let vocabulary: BTreeSet<&str> = resume_counts
            .keys()
            .chain(job_counts.keys())
            .map(String::as_str)
            .collect();

        let mut resume_vec = Vec::with_capacity(vocabulary.len());
        let mut job_vec = Vec::with_capacity(vocabulary.len());
        for term in &vocabulary {
            let resume_count = resume_counts.get(*term).copied().unwrap_or(0);
            let job_count = job_counts.get(*term).copied().unwrap_or(0);
            let df = usize::from(resume_count > 0) + usize::from(job_count > 0);
            let idf = smoothed_idf(df);

            resume_vec.push(sublinear_tf(resume_count) * idf);
            job_vec.push(sublinear_tf(job_count) * idf);
        }

        let score = cosine_similarity(&resume_vec, &job_vec).clamp(0.0, 1.0) as f32;

        let resume_norm = l2_normalize(&resume_vec);
        let job_norm = l2_normalize(&job_vec);
        let terms: Vec<&str> = vocabulary.into_iter().collect();

        // overlap statistics stay on single words
        let resume_words: BTreeSet<&str> = resume_tokens.iter().map(String::as_str).collect();
        let job_words: BTreeSet<&str> = job_tokens.iter().map(String::as_str).collect();
        let shared = resume_words.intersection(&job_words).count();
        let jaccard_similarity = shared as f32 / resume_words.union(&job_words).count() as f32;
        let term_coverage = shared as f32 / job_words.len().max(1) as f32;

        Ok(SimilarityResult {
            score,
            method: METHOD_TFIDF_COSINE.to_string(),
            interpretation: interpret_score(score).to_string(),
            top_matching_terms: self.top_matching_terms(&terms, &resume_norm, &job_norm),
            resume_unique_terms: self.unique_terms(&terms, &resume_norm, &job_norm),
            job_unique_terms: self.unique_terms(&terms, &job_norm, &resume_norm),
            jaccard_similarity,
            term_coverage,
        })
    }

    /// Shared terms ranked by the smaller of their two normalized weights
    fn top_matching_terms(&self, terms: &[&str], a: &[f64], b: &[f64]) -> Vec<TermWeight> {
        let mut overlap: Vec<(&str, f64)> = terms
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(term, (x, y))| (*term, x.min(*y)))
            .filter(|(_, w)| *w > 0.0)
            .collect();

        overlap.sort_by(|x, y| y.1.total_cmp(&x.1).then_with(|| x.0.cmp(y.0)));
        overlap
            .into_iter()
            .take(self.top_terms)
            .map(|(term, weight)| TermWeight {
                term: term.to_string(),
                weight: weight as f32,
            })
            .collect()
    }

    /// Terms weighted in `doc` but absent from `other`
    fn unique_terms(&self, terms: &[&str], doc: &[f64], other: &[f64]) -> Vec<String> {
        let mut unique: Vec<(&str, f64)> = terms
            .iter()
            .zip(doc.iter().zip(other.iter()))
            .filter(|(_, (x, y))| **x > 0.0 && **y == 0.0)
            .map(|(term, (x, _))| (*term, *x))
            .collect();

        unique.sort_by(|x, y| y.1.total_cmp(&x.1).then_with(|| x.0.cmp(y.0)));
        unique
            .into_iter()
            .take(self.top_terms)
            .map(|(term, _)| term.to_string())
            .collect()
    }
}

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

fn l2_normalize(v: &[f64]) -> Vec<f64> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        v.to_vec()
    } else {
        v.iter().map(|x| x / norm).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_idf_formula_is_pinned() {
        assert!((smoothed_idf(2) - 1.0).abs() < 1e-12);
        assert!((smoothed_idf(1) - 1.405_465_108_108_164_4).abs() < 1e-12);
        assert_eq!(sublinear_tf(1), 1.0);
        assert!((sublinear_tf(2) - (1.0 + 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_pinned_score() {
        // one shared term (weight 1.0) and one unique term on each side
        let result = SimilarityScorer::new(10, 1)
            .score(&tokens(&["alpha", "beta"]), &tokens(&["alpha", "gamma"]))
            .unwrap();

        assert!((result.score - 0.336_096_9).abs() < 1e-5);
        assert_eq!(result.method, "tfidf-cosine");
        assert_eq!(result.interpretation, "Weak match");
    }

    #[test]
    fn test_pinned_score_with_ngrams() {
        // the bigrams "alpha beta" and "alpha gamma" add one unique term per side
        let result = SimilarityScorer::default()
            .score(&tokens(&["alpha", "beta"]), &tokens(&["alpha", "gamma"]))
            .unwrap();

        assert!((result.score - 0.201_993_1).abs() < 1e-5);
        assert_eq!(result.interpretation, "Poor match");
        assert!(result.job_unique_terms.contains(&"alpha gamma".to_string()));
    }

    #[test]
    fn test_ngrams_capture_word_order() {
        let a = tokens(&["machine", "learning"]);
        let b = tokens(&["learning", "machine"]);

        let unigrams = SimilarityScorer::new(10, 1).score(&a, &b).unwrap();
        let ngrams = SimilarityScorer::new(10, 3).score(&a, &b).unwrap();

        assert!((unigrams.score - 1.0).abs() < 1e-6);
        assert!(ngrams.score < 0.6);
        assert_eq!(ngrams.jaccard_similarity, 1.0);
    }

    #[test]
    fn test_identical_texts_score_one() {
        let doc = tokens(&["rust", "python", "python", "docker"]);
        let result = SimilarityScorer::default().score(&doc, &doc).unwrap();

        assert!((result.score - 1.0).abs() < 1e-6);
        assert_eq!(result.jaccard_similarity, 1.0);
        assert_eq!(result.term_coverage, 1.0);
        assert!(result.resume_unique_terms.is_empty());
    }

    #[test]
    fn test_score_is_symmetric() {
        let scorer = SimilarityScorer::default();
        let a = tokens(&["python", "sql", "docker", "experienc", "develop"]);
        let b = tokens(&["look", "python", "sql", "aws", "kubernetes", "expert", "sql"]);

        let ab = scorer.score(&a, &b).unwrap();
        let ba = scorer.score(&b, &a).unwrap();

        assert_eq!(ab.score, ba.score);
        assert_eq!(ab.resume_unique_terms, ba.job_unique_terms);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        let result = SimilarityScorer::default()
            .score(&tokens(&["alpha"]), &tokens(&["beta"]))
            .unwrap();

        assert_eq!(result.score, 0.0);
        assert_eq!(result.interpretation, "Poor match");
        assert!(result.top_matching_terms.is_empty());
    }

    #[test]
    fn test_breakdown_terms() {
        let result = SimilarityScorer::new(2, 1)
            .score(
                &tokens(&["python", "sql", "docker", "docker"]),
                &tokens(&["python", "sql", "aws"]),
            )
            .unwrap();

        assert_eq!(result.resume_unique_terms, vec!["docker".to_string()]);
        assert_eq!(result.job_unique_terms, vec!["aws".to_string()]);
        assert_eq!(result.top_matching_terms.len(), 2);
        assert!((result.term_coverage - 2.0 / 3.0).abs() < 1e-6);
        assert!((result.jaccard_similarity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_tokens_are_insufficient() {
        let scorer = SimilarityScorer::default();

        assert!(matches!(
            scorer.score(&[], &tokens(&["python"])),
            Err(ResumeGapError::InsufficientText(_))
        ));
        assert!(matches!(
            scorer.score(&tokens(&["python"]), &[]),
            Err(ResumeGapError::InsufficientText(_))
        ));
    }

    #[test]
    fn test_interpretation_bands() {
        assert_eq!(interpret_score(0.8), "Strong match");
        assert_eq!(interpret_score(0.6), "Good match");
        assert_eq!(interpret_score(0.5), "Moderate match");
        assert_eq!(interpret_score(0.3), "Weak match");
        assert_eq!(interpret_score(0.1), "Poor match");
    }
}
