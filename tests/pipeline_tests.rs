//! End-to-end tests for gap detection, bullet synthesis and resume rewriting

use chrono::{Local, TimeZone};
use resume_tailor::config::Config;
use resume_tailor::error::TailorError;
use resume_tailor::input::InputManager;
use resume_tailor::llm::{GenerationRequest, GeneratorError, SentenceGenerator};
use resume_tailor::output::tailored_output_path;
use resume_tailor::processing::catalog::SkillCatalog;
use resume_tailor::processing::classifier::CategoryClassifier;
use resume_tailor::processing::gap_detector::GapDetector;
use resume_tailor::processing::pipeline::TailoringEngine;
use resume_tailor::processing::skill::SkillTerm;
use resume_tailor::processing::skill_extractor::SkillExtractor;
use resume_tailor::processing::synthesizer::{BulletSource, BulletSynthesizer, SynthesisContext, SynthesisOptions};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes one well-formed sentence per requested skill
struct EchoGenerator {
    calls: AtomicUsize,
}

impl EchoGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl SentenceGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<String>, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(request
            .skills
            .iter()
            .map(|s| format!("1. Delivered {} improvements across the production platform with measurable gains", s))
            .collect())
    }

    fn name(&self) -> String {
        "echo".to_string()
    }
}

/// Always answers with nothing usable
struct SilentGenerator;

impl SentenceGenerator for SilentGenerator {
    async fn generate(&self, _request: &GenerationRequest<'_>) -> Result<Vec<String>, GeneratorError> {
        Ok(vec!["Sure, here you go:".to_string()])
    }

    fn name(&self) -> String {
        "silent".to_string()
    }
}

fn terms(names: &[&str]) -> Vec<SkillTerm> {
    names.iter().filter_map(|n| SkillTerm::new(n)).collect()
}

fn context() -> SynthesisContext<'static> {
    SynthesisContext {
        job_text: "Platform engineer",
        resume_text: "Software engineer",
    }
}

#[test]
fn test_extracts_listed_technologies() {
    let extractor = SkillExtractor::new();
    let result = extractor.extract_skills("Required: experience with Kubernetes, Jenkins, AWS, and Lambda.");

    for skill in ["Kubernetes", "Jenkins", "AWS", "Lambda"] {
        assert!(result.contains(skill), "missing {}", skill);
    }
}

#[test]
fn test_find_missing_ignores_case() {
    let detector = GapDetector::default();
    let missing = detector.find_missing(
        &terms(&["Kubernetes", "Terraform"]),
        "Operated KUBERNETES clusters for five years",
    );

    assert_eq!(missing, terms(&["Terraform"]));
}

#[tokio::test]
async fn test_catalog_template_and_generic_fallback() {
    let catalog = SkillCatalog::builtin();
    let synthesizer = BulletSynthesizer::new(catalog, SynthesisOptions::default());

    let synthesis = synthesizer
        .synthesize(&terms(&["Terraform", "Quantum Flux Capacitor Tuning"]), context())
        .await
        .unwrap();

    assert_eq!(synthesis.bullets.len(), 2);
    assert_eq!(
        synthesis.bullets[0].render(),
        format!("- {}", catalog.exact("Terraform").unwrap().template)
    );
    assert_eq!(synthesis.bullets[1].source, BulletSource::Fallback);
    assert!(synthesis.bullets[1].sentence.contains("Quantum Flux Capacitor Tuning"));
    assert_eq!(synthesis.fallbacks.len(), 1);
}

#[tokio::test]
async fn test_generator_covers_catalog_misses() {
    let catalog = SkillCatalog::builtin();
    let generator = EchoGenerator::new();
    let synthesizer = BulletSynthesizer::new(catalog, SynthesisOptions::default()).with_generator(&generator);

    let synthesis = synthesizer
        .synthesize(&terms(&["Loki", "Terraform", "Tempo"]), context())
        .await
        .unwrap();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(synthesis.fallbacks.is_empty());
    assert_eq!(
        synthesis.bullets[0].sentence,
        "Delivered Loki improvements across the production platform with measurable gains"
    );
    assert!(matches!(synthesis.bullets[1].source, BulletSource::Catalog { .. }));
    assert!(synthesis.bullets[2].sentence.contains("Tempo"));
}

#[tokio::test]
async fn test_lenient_and_strict_generation() {
    let catalog = SkillCatalog::builtin();
    let gaps = terms(&["Loki"]);

    let lenient = BulletSynthesizer::new(catalog, SynthesisOptions::default()).with_generator(&SilentGenerator);
    let synthesis = lenient.synthesize(&gaps, context()).await.unwrap();
    assert_eq!(synthesis.bullets[0].source, BulletSource::Fallback);

    let options = SynthesisOptions {
        strict_generation: true,
        ..SynthesisOptions::default()
    };
    let strict = BulletSynthesizer::new(catalog, options).with_generator(&SilentGenerator);
    match strict.synthesize(&gaps, context()).await {
        Err(TailorError::SynthesisAborted(uncovered)) => {
            assert_eq!(uncovered.len(), 1);
            assert_eq!(uncovered[0].skill.as_str(), "Loki");
        }
        other => panic!("expected an aborted synthesis, got {:?}", other.map(|s| s.bullets.len())),
    }
}

#[test]
fn test_classifier_on_job_fixture() {
    let job = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();
    let summary = CategoryClassifier::new().classify(&job);

    assert_eq!(summary.cloud_services, vec!["ECS Fargate", "Lambda"]);
    assert_eq!(summary.cicd_tools, vec!["GitHub Actions"]);
    assert_eq!(summary.databases, vec!["PostgreSQL"]);
    assert!(summary.monitoring.contains(&"Grafana".to_string()));
}

#[tokio::test]
async fn test_tailor_markdown_resume() {
    let dir = tempfile::tempdir().unwrap();
    let resume_path = dir.path().join("resume.md");
    std::fs::copy("tests/fixtures/sample_resume.md", &resume_path).unwrap();
    let original = std::fs::read_to_string(&resume_path).unwrap();

    let mut manager = InputManager::new();
    let job_text = manager.extract_text(Path::new("tests/fixtures/sample_job.txt")).await.unwrap();
    let mut document = manager.load_document(&resume_path).await.unwrap();

    let mut config = Config::default();
    config.document.max_gaps = 100;
    let engine = TailoringEngine::new(&config).unwrap();
    let generator = EchoGenerator::new();

    let plan = engine.plan_with_generator(&job_text, &document, &generator).await.unwrap();
    let gaps: Vec<&str> = plan.analysis.gaps.skills.iter().map(|s| s.as_str()).collect();
    assert!(gaps.contains(&"Terraform"));
    assert!(gaps.contains(&"Loki"));
    assert!(!gaps.contains(&"Kubernetes"));
    assert!(plan.synthesis.fallbacks.is_empty());

    let report = engine.apply(&plan, &mut document);
    assert_eq!(report.role.inserted, plan.synthesis.bullets.len());
    assert!(report.role.note.is_none());

    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    let output_path = tailored_output_path(&resume_path, dir.path(), at);
    std::fs::write(&output_path, document.render()).unwrap();

    assert_eq!(
        output_path.file_name().unwrap().to_string_lossy(),
        "resume_Updated_20240309_140507.md"
    );
    let tailored = std::fs::read_to_string(&output_path).unwrap();
    assert!(tailored.contains("- Migrated deployments to Kubernetes with zero downtime\n- "));
    assert!(tailored.contains("using **Terraform** for"));
    assert!(tailored.contains("| Cloud Technologies | Amazon Web Services, EC2, S3, ECS Fargate, Lambda |"));
    assert!(tailored.contains("| CI/CD Tools | Jenkins, GitHub Actions |"));
    assert!(tailored.contains("| Databases | MySQL, PostgreSQL |"));
    assert!(tailored.contains("### Initech, Software Engineer, 2016 - 2021\n- Maintained the Jenkins build farm"));

    assert_eq!(std::fs::read_to_string(&resume_path).unwrap(), original);
}

#[tokio::test]
async fn test_tailor_plain_text_resume_without_generator() {
    let manager = InputManager::new();
    let mut document = manager
        .load_document(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let engine = TailoringEngine::new(&Config::default()).unwrap();
    let plan = engine.plan("Must know Terraform and Kubernetes", &document).await.unwrap();
    engine.apply(&plan, &mut document);
    let rendered = document.render();

    let terraform = SkillCatalog::builtin().exact("Terraform").unwrap().template.clone();
    assert!(rendered.contains(&format!(
        "- Migrated deployments to Kubernetes with zero downtime\n- {}\n",
        terraform
    )));
    assert!(!rendered.contains("**"));
}
