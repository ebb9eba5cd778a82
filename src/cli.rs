//! CLI interface for the skill gap analyzer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-gap")]
#[command(version)]
#[command(about = "Find the skills a job description asks for that a resume is missing")]
#[command(long_about = "Compare a resume with a job description using TF-IDF similarity and a curated skill catalog, then report missing or weakly evidenced skills by priority")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description passed inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include term weights, unique terms and document statistics
        #[arg(short, long)]
        detailed: bool,

        /// Skill catalog file overriding the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Skill catalog commands
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List catalog skills
    List {
        /// Show only one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the variants of one skill
    Show {
        /// Canonical skill name (case-insensitive)
        skill: String,
    },

    /// Check a catalog file for integrity problems
    Validate {
        /// Catalog TOML file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "analysis.emphasis_ratio")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "txt", "md"];
        assert!(validate_file_extension(Path::new("resume.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("resume.docx"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("resume"), &allowed).is_err());
    }

    #[test]
    fn test_analyze_requires_a_job_source() {
        assert!(Cli::try_parse_from(["resume-gap", "analyze", "--resume", "r.txt"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-gap", "analyze", "--resume", "r.txt", "--job", "j.txt", "--job-text", "Rust"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["resume-gap", "analyze", "-r", "r.txt", "--job-text", "Rust"]).unwrap();
        match cli.command {
            Commands::Analyze { job, job_text, .. } => {
                assert!(job.is_none());
                assert_eq!(job_text.as_deref(), Some("Rust"));
            }
            _ => panic!("expected analyze"),
        }
    }
}
