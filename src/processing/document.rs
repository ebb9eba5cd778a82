//! Document structures

use crate::error::{Result, ResumeGapError};
use crate::processing::text_processor::Normalizer;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    JobDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub token_count: usize,
}

/// Raw text together with its normalized tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    document_type: DocumentType,
    tokens: Vec<String>,
    stats: DocumentStats,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::JobDescription => "job description",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Document {
    pub fn new(content: String, document_type: DocumentType, normalizer: &Normalizer) -> Result<Self> {
        let tokens = normalizer.normalize(&content).map_err(|e| match e {
            ResumeGapError::EmptyInput(_) => ResumeGapError::EmptyInput(document_type.label().to_string()),
            other => other,
        })?;

        let stats = DocumentStats {
            word_count: content.unicode_words().count(),
            sentence_count: content
                .unicode_sentences()
                .filter(|s| !s.trim().is_empty())
                .count(),
            token_count: tokens.len(),
        };

        Ok(Self {
            content,
            document_type,
            tokens,
            stats,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let normalizer = Normalizer::default();
        let content = "John Doe. Software Engineer.\n\nSkills: Rust, Python, JavaScript".to_string();
        let doc = Document::new(content.clone(), DocumentType::Resume, &normalizer).unwrap();

        assert_eq!(doc.content(), content);
        assert_eq!(doc.document_type(), DocumentType::Resume);
        assert_eq!(doc.stats().word_count, 8);
        assert_eq!(doc.stats().sentence_count, 3);
        assert_eq!(doc.stats().token_count, doc.tokens().len());
    }

    #[test]
    fn test_empty_document_names_its_kind() {
        let normalizer = Normalizer::default();
        let result = Document::new("   ".to_string(), DocumentType::JobDescription, &normalizer);

        match result {
            Err(ResumeGapError::EmptyInput(what)) => assert_eq!(what, "job description"),
            other => panic!("expected EmptyInput, got {:?}", other),
        }
    }
}
