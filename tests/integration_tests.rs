//! Integration tests for resume-gap

use resume_gap::config::{AnalysisConfig, CatalogConfig, Config, OutputFormat};
use resume_gap::input::InputManager;
use resume_gap::output::{GapReport, ReportGenerator};
use resume_gap::processing::gap_analyzer::{GapKind, Priority};
use resume_gap::{Pipeline, ResumeGapError, SkillCatalog};
use std::path::Path;
use std::sync::Arc;

fn builtin_pipeline() -> Pipeline {
    let catalog = Arc::new(SkillCatalog::builtin().unwrap());
    Pipeline::new(catalog, &AnalysisConfig::default()).unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_caching_can_be_disabled() {
    let mut config = Config::default();
    config.input.enable_caching = false;
    let mut manager = InputManager::from_config(&config.input);

    manager
        .extract_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ResumeGapError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_end_to_end_fixture_analysis() {
    let mut manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let job = manager
        .extract_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();

    let analysis = builtin_pipeline().analyze(&resume, &job).unwrap();

    let gaps: Vec<(&str, GapKind, Priority)> = analysis
        .gaps
        .iter()
        .map(|g| (g.skill.canonical_name.as_str(), g.kind, g.priority))
        .collect();
    assert_eq!(
        gaps,
        vec![
            ("AWS", GapKind::Missing, Priority::Critical),
            ("Kubernetes", GapKind::Missing, Priority::Critical),
            ("Terraform", GapKind::Missing, Priority::Critical),
            ("Redis", GapKind::Missing, Priority::Moderate),
        ]
    );

    let matched: Vec<&str> = analysis
        .matched_skills
        .iter()
        .map(|s| s.canonical_name.as_str())
        .collect();
    assert_eq!(matched, vec!["Docker", "Node.js", "PostgreSQL", "React", "TypeScript"]);

    // contact details never reach the token stream
    assert!(!analysis
        .similarity
        .resume_unique_terms
        .iter()
        .any(|t| t.contains("example") || t.contains("555")));

    assert!(analysis.similarity.score > 0.0 && analysis.similarity.score < 1.0);
    assert!((analysis.skill_match_score - 5.0 / 9.0).abs() < 1e-6);

    let report = GapReport::new(analysis, None, None, 0.5);
    let generator = ReportGenerator::new(false, true);
    let console = generator.generate(&report, OutputFormat::Console).unwrap();
    assert!(console.contains("[!] Terraform (devops, missing)"));
    assert!(console.contains("[*] Redis (databases, missing)"));
}

#[test]
fn test_job_without_catalog_skills() {
    let analysis = builtin_pipeline()
        .analyze(
            "Friendly barista with latte art experience",
            "Friendly barista wanted for busy morning shifts",
        )
        .unwrap();

    assert!(analysis.job_skills.is_empty());
    assert!(analysis.gaps.is_empty());
    assert!(analysis.category_coverage.is_empty());
    assert_eq!(analysis.skill_match_score, 0.0);
}

#[test]
fn test_custom_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skills.toml");
    std::fs::write(
        &path,
        r#"
version = 7

[categories]
frameworks = 1.1

[[skills]]
name = "Elixir"
category = "languages"
variants = ["elixir", "ex"]

[[skills]]
name = "Phoenix"
category = "frameworks"
weight = 1.2
variants = ["phoenix framework", "phoenix"]
"#,
    )
    .unwrap();

    let catalog = SkillCatalog::load(&CatalogConfig { path: Some(path) }).unwrap();
    assert_eq!(catalog.version(), 7);
    assert_eq!(catalog.max_variant_tokens(), 2);

    let pipeline = Pipeline::new(Arc::new(catalog), &AnalysisConfig::default()).unwrap();
    let analysis = pipeline
        .analyze("Elixir developer", "Elixir and Phoenix Framework engineer")
        .unwrap();

    assert_eq!(analysis.catalog_version, 7);
    assert_eq!(analysis.gaps.len(), 1);
    assert_eq!(analysis.gaps[0].skill.canonical_name, "Phoenix");
    assert_eq!(analysis.gaps[0].priority, Priority::Critical);
    assert!((analysis.gaps[0].impact - 0.88).abs() < 1e-6);
    assert_eq!(analysis.match_confidence, 1.0);
}

#[test]
fn test_overlapping_catalog_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
version = 1

[[skills]]
name = "Go"
category = "languages"
variants = ["golang", "go"]

[[skills]]
name = "Go Kit"
category = "frameworks"
variants = ["go"]
"#,
    )
    .unwrap();

    match SkillCatalog::from_path(&path) {
        Err(ResumeGapError::CatalogIntegrity { variant, first, second }) => {
            assert_eq!(variant, "go");
            assert_eq!(first, "Go");
            assert_eq!(second, "Go Kit");
        }
        other => panic!("expected CatalogIntegrity, got {:?}", other.map(|c| c.len())),
    }
}
