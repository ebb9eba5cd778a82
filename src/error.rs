//! Error handling for the resume gap analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeGapError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Insufficient text: {0}")]
    InsufficientText(String),

    #[error("Catalog integrity error: variant '{variant}' is claimed by both '{first}' and '{second}'")]
    CatalogIntegrity {
        variant: String,
        first: String,
        second: String,
    },

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeGapError>;

impl ResumeGapError {
    /// Message suitable for showing to the person running the analysis.
    pub fn user_message(&self) -> String {
        match self {
            ResumeGapError::EmptyInput(what) => {
                format!("Nothing to analyze: please provide a non-empty {}.", what)
            }
            ResumeGapError::InsufficientText(what) => format!(
                "The {} has no meaningful words left after cleanup; please provide more descriptive text.",
                what
            ),
            ResumeGapError::CatalogIntegrity { .. } | ResumeGapError::CatalogLoad(_) => {
                format!("The skill catalog is invalid and must be fixed by an operator ({}).", self)
            }
            ResumeGapError::Configuration(_) => {
                format!("The configuration is invalid ({}).", self)
            }
            ResumeGapError::UnsupportedFormat(_) | ResumeGapError::PdfExtraction(_) => {
                format!("The document could not be read ({}).", self)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_user_message() {
        let err = ResumeGapError::EmptyInput("job description".to_string());
        assert_eq!(
            err.user_message(),
            "Nothing to analyze: please provide a non-empty job description."
        );
    }

    #[test]
    fn test_integrity_display_names_both_skills() {
        let err = ResumeGapError::CatalogIntegrity {
            variant: "dsa".to_string(),
            first: "Algorithms".to_string(),
            second: "Data Structures".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("'dsa'"));
        assert!(text.contains("Algorithms"));
        assert!(text.contains("Data Structures"));
    }
}
