//! Configuration management for the resume gap analyzer

use crate::error::{Result, ResumeGapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub catalog: CatalogConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Tunable thresholds for scoring and gap prioritization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// A shared skill is "weak" when job_count >= emphasis_ratio * resume_count
    pub emphasis_ratio: f32,
    /// A shared skill is "underrepresented" when job_count >= minor_emphasis_ratio * resume_count
    pub minor_emphasis_ratio: f32,
    /// Category coverage below this makes a missing skill critical
    pub critical_coverage: f32,
    /// Number of terms listed in the similarity breakdown
    pub top_terms: usize,
    /// Longest word n-gram used as a TF-IDF term
    pub max_ngram: usize,
    /// Jaro-Winkler threshold for near-miss hints on missing skills
    pub fuzzy_threshold: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Custom catalog file; the built-in catalog is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub min_pdf_chars: usize,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

const MAX_NGRAM_LIMIT: usize = 5;

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            emphasis_ratio: 3.0,
            minor_emphasis_ratio: 2.0,
            critical_coverage: 0.5,
            top_terms: 10,
            max_ngram: 3,
            fuzzy_threshold: 0.88,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_pdf_chars: 100,
            enable_caching: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            catalog: CatalogConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.emphasis_ratio > 1.0) {
            return Err(ResumeGapError::Configuration(format!(
                "analysis.emphasis_ratio must be greater than 1.0, got {}",
                self.emphasis_ratio
            )));
        }
        if !(self.minor_emphasis_ratio > 1.0) || self.minor_emphasis_ratio > self.emphasis_ratio {
            return Err(ResumeGapError::Configuration(format!(
                "analysis.minor_emphasis_ratio must be in (1.0, {}], got {}",
                self.emphasis_ratio, self.minor_emphasis_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.critical_coverage) {
            return Err(ResumeGapError::Configuration(format!(
                "analysis.critical_coverage must be within [0, 1], got {}",
                self.critical_coverage
            )));
        }
        if !(1..=MAX_NGRAM_LIMIT).contains(&self.max_ngram) {
            return Err(ResumeGapError::Configuration(format!(
                "analysis.max_ngram must be between 1 and {}, got {}",
                MAX_NGRAM_LIMIT, self.max_ngram
            )));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(ResumeGapError::Configuration(format!(
                "analysis.fuzzy_threshold must be within [0, 1], got {}",
                self.fuzzy_threshold
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeGapError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeGapError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-gap")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()
    }

    /// Set a value by dotted key, e.g. "analysis.emphasis_ratio"
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value.parse::<T>().map_err(|_| {
                ResumeGapError::Configuration(format!("Invalid value '{}' for {}", value, key))
            })
        }

        match key {
            "analysis.emphasis_ratio" => self.analysis.emphasis_ratio = parse(key, value)?,
            "analysis.minor_emphasis_ratio" => self.analysis.minor_emphasis_ratio = parse(key, value)?,
            "analysis.critical_coverage" => self.analysis.critical_coverage = parse(key, value)?,
            "analysis.top_terms" => self.analysis.top_terms = parse(key, value)?,
            "analysis.max_ngram" => self.analysis.max_ngram = parse(key, value)?,
            "analysis.fuzzy_threshold" => self.analysis.fuzzy_threshold = parse(key, value)?,
            "catalog.path" => {
                self.catalog.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "input.min_pdf_chars" => self.input.min_pdf_chars = parse(key, value)?,
            "input.enable_caching" => self.input.enable_caching = parse(key, value)?,
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(ResumeGapError::Configuration)?
            }
            "output.detailed" => self.output.detailed = parse(key, value)?,
            "output.color_output" => self.output.color_output = parse(key, value)?,
            _ => {
                return Err(ResumeGapError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        self.validate()
    }
}
