//! resume-gap: find the skills a job description asks for that a resume is missing

use clap::Parser;
use colored::Colorize;
use log::{error, info};
use resume_gap::cli::{self, CatalogAction, Cli, Commands, ConfigAction};
use resume_gap::config::Config;
use resume_gap::input::InputManager;
use resume_gap::output::{GapReport, ReportGenerator};
use resume_gap::processing::catalog::SkillCatalog;
use resume_gap::{Pipeline, Result, ResumeGapError};
use std::path::Path;
use std::process;
use std::sync::Arc;

const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            output,
            save,
            detailed,
            catalog,
        } => {
            if catalog.is_some() {
                config.catalog.path = catalog;
            }
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeGapError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            cli::validate_file_extension(&resume, SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeGapError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job) = &job {
                cli::validate_file_extension(job, SUPPORTED_EXTENSIONS)
                    .map_err(|e| ResumeGapError::InvalidInput(format!("Job description file: {}", e)))?;
            }

            let catalog = Arc::new(SkillCatalog::load(&config.catalog)?);
            let pipeline = Pipeline::new(catalog, &config.analysis)?;

            let mut input_manager = InputManager::from_config(&config.input);
            info!("Reading resume from {}", resume.display());
            let resume_text = input_manager.extract_text(&resume).await?;
            let (job_text, job_source) = match (job, job_text) {
                (Some(path), _) => {
                    info!("Reading job description from {}", path.display());
                    (input_manager.extract_text(&path).await?, Some(path.display().to_string()))
                }
                (None, Some(text)) => (text, None),
                (None, None) => {
                    return Err(ResumeGapError::InvalidInput(
                        "Provide a job description with --job or --job-text".to_string(),
                    ))
                }
            };

            let analysis = pipeline.analyze(&resume_text, &job_text)?;
            let report = GapReport::new(
                analysis,
                Some(resume.display().to_string()),
                job_source,
                config.analysis.critical_coverage,
            );

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::new(use_colors, detailed);
            match save {
                Some(path) => {
                    generator.save_report(&report, output_format, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", generator.generate(&report, output_format)?),
            }
        }

        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => {
                let catalog = SkillCatalog::load(&config.catalog)?;
                println!("📚 Skill catalog v{} ({} skills)\n", catalog.version(), catalog.len());

                for current in catalog.categories() {
                    if category.as_deref().is_some_and(|c| !c.eq_ignore_ascii_case(current)) {
                        continue;
                    }
                    println!("{}", current.bold());
                    for skill in catalog.skills().iter().filter(|s| s.category == current) {
                        println!("  • {}", skill.canonical_name);
                    }
                }
            }

            CatalogAction::Show { skill } => {
                let catalog = SkillCatalog::load(&config.catalog)?;
                let entry = catalog
                    .get(&skill)
                    .ok_or_else(|| ResumeGapError::InvalidInput(format!("Unknown skill: {}", skill)))?;

                println!("Name: {}", entry.canonical_name);
                println!("Category: {} (weight {:.1})", entry.category, catalog.category_weight(&entry.category));
                println!("Weight: {:.1}", entry.weight);
                println!("Variants:");
                for variant in &entry.variants {
                    println!("  • {}", variant);
                }
            }

            CatalogAction::Validate { path } => {
                let catalog = SkillCatalog::from_path(&path)?;
                println!(
                    "✅ {} is valid: {} skills in {} categories",
                    path.display(),
                    catalog.len(),
                    catalog.categories().len()
                );
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Analysis:");
                println!("  Emphasis ratio (weak): {:.1}x", config.analysis.emphasis_ratio);
                println!("  Emphasis ratio (underrepresented): {:.1}x", config.analysis.minor_emphasis_ratio);
                println!("  Critical coverage: {:.0}%", config.analysis.critical_coverage * 100.0);
                println!("  Top terms: {}", config.analysis.top_terms);
                println!("  N-gram range: 1-{}", config.analysis.max_ngram);
                println!("  Fuzzy threshold: {:.2}", config.analysis.fuzzy_threshold);
                println!(
                    "\nCatalog: {}",
                    config
                        .catalog
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in".to_string())
                );
                println!("\nInput:");
                println!("  Minimum PDF characters: {}", config.input.min_pdf_chars);
                println!("  Caching: {}", config.input.enable_caching);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Detailed: {}", config.output.detailed);
                println!("  Colors: {}", config.output.color_output);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(&key, &value)?;
                config.save_to(config_path)?;
                println!("🔧 Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}
