//! Text extraction from various file formats

use crate::error::{Result, ResumeGapError};
use log::debug;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// PDF extraction with a sanity check on the recovered text
pub struct PdfExtractor {
    min_chars: usize,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PdfExtractor {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Scanned or garbled PDFs come back short or mostly non-alphabetic
    pub fn is_meaningful(&self, text: &str) -> bool {
        let stripped = text.trim();
        let total_chars = stripped.chars().count();
        if total_chars == 0 || total_chars < self.min_chars {
            return false;
        }

        let alpha_chars = stripped.chars().filter(|c| c.is_alphabetic()).count();
        alpha_chars as f32 / total_chars as f32 > 0.4
    }
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeGapError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;

        if !self.is_meaningful(&text) {
            return Err(ResumeGapError::PdfExtraction(format!(
                "PDF '{}' yielded too little readable text ({} characters)",
                path.display(),
                text.trim().chars().count()
            )));
        }

        debug!("Extracted {} characters from {}", text.len(), path.display());
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render markdown to HTML, then strip tags and entities
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
    let clean_text = tag_regex.replace_all(&text, "").replace("&amp;", "&");

    clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
