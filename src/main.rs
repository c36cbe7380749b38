//! resume-tailor: add missing job-description skills to a resume

use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction};
use resume_tailor::config::{Config, OutputFormat};
use resume_tailor::error::{Result, TailorError};
use resume_tailor::input::InputManager;
use resume_tailor::llm::client::AnthropicGenerator;
use resume_tailor::output::{save_report_to_file, tailored_output_path, ReportGenerator, ReportMetadata, TailoringReport};
use resume_tailor::processing::document::{DocumentFormat, StructuredDocument};
use resume_tailor::processing::pipeline::{TailoringEngine, TailoringPlan};
use resume_tailor::processing::synthesizer::Synthesis;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, cli.config, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config_path: Option<PathBuf>, mut config: Config) -> Result<()> {
    match command {
        Commands::Tailor {
            resume,
            job,
            output_dir,
            strict,
            no_generator,
            output,
            save,
            detailed,
            dry_run,
        } => {
            cli::validate_file_extension(&resume, &["txt", "md", "markdown"])
                .map_err(|e| TailorError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["txt", "md", "markdown"])
                .map_err(|e| TailorError::InvalidInput(format!("Job description file: {}", e)))?;

            let format = resolve_format(output.as_deref(), &config)?;
            if strict {
                config.generation.strict = true;
            }

            println!("🚀 Resume tailoring");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());
            if config.generation.strict {
                println!("🔒 Strict generation enabled");
            }

            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            if job_text.trim().is_empty() {
                return Err(TailorError::InvalidInput(format!("{} is empty", job.display())));
            }
            let mut document = input_manager.load_document(&resume).await?;

            let engine = TailoringEngine::new(&config)?;

            let generator = if config.generation.enabled && !no_generator {
                match AnthropicGenerator::from_env(&config.generation.api_key_env, config.generation.client_settings()) {
                    Some(Ok(generator)) => Some(generator),
                    Some(Err(e)) => {
                        warn!("Text generator unavailable: {}", e);
                        None
                    }
                    None => {
                        info!(
                            "{} not set; skills outside the catalog get generic sentences",
                            config.generation.api_key_env
                        );
                        None
                    }
                }
            } else {
                None
            };

            println!("\n🔍 Finding missing skills...");
            let plan = match &generator {
                Some(generator) => {
                    let spinner = spinner(&format!("✍️  Writing bullets with {}...", config.generation.model));
                    let plan = engine.plan_with_generator(&job_text, &document, generator).await;
                    spinner.finish_and_clear();
                    plan?
                }
                None => engine.plan(&job_text, &document).await?,
            };

            println!(
                "✓ Found {} skills, {} missing from the resume",
                plan.analysis.extraction.len(),
                plan.analysis.gaps.len()
            );

            if !plan.analysis.is_relevant() {
                println!("\n⚠️  No relevant skills found; resume left unchanged");
                return Ok(());
            }

            let mutation = engine.apply(&plan, &mut document);
            let rendered = document.render();

            let mut metadata = ReportMetadata::new(&resume.to_string_lossy(), &job.to_string_lossy());
            metadata.strict_generation = engine.strict_generation();
            metadata.generator = generator.as_ref().map(|_| config.generation.model.clone());

            if dry_run {
                println!("\n{}", rendered);
            } else {
                let target_dir = output_dir
                    .or_else(|| config.output.output_dir.clone())
                    .unwrap_or_else(|| resume.parent().map(Path::to_path_buf).unwrap_or_default());
                let output_path = tailored_output_path(&resume, &target_dir, Local::now());
                save_report_to_file(&rendered, &output_path)?;
                println!("\n✅ Saved: {}", output_path.display());
                metadata.output_path = Some(output_path.to_string_lossy().to_string());
            }

            let report = TailoringReport::from_plan(&plan, Some(mutation), metadata);
            emit_report(&report, &format, &config, detailed, save.as_deref())?;
        }

        Commands::Analyze { resume, job, output } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| TailorError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["txt", "md", "markdown"])
                .map_err(|e| TailorError::InvalidInput(format!("Job description file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            let document = match input_manager.load_document(&resume).await {
                Ok(document) => document,
                Err(TailorError::UnsupportedFormat(_)) => {
                    let text = input_manager.extract_text(&resume).await?;
                    StructuredDocument::parse(&text, DocumentFormat::PlainText)
                }
                Err(e) => return Err(e),
            };

            let engine = TailoringEngine::new(&config)?;
            let start = Instant::now();
            let plan = TailoringPlan {
                analysis: engine.analyze(&job_text, &document),
                synthesis: Synthesis::default(),
                processing_time_ms: start.elapsed().as_millis() as u64,
            };

            let metadata = ReportMetadata::new(&resume.to_string_lossy(), &job.to_string_lossy());
            let report = TailoringReport::from_plan(&plan, None, metadata);
            emit_report(&report, &format, &config, true, None)?;
        }

        Commands::Catalog { filter } => {
            let engine = TailoringEngine::new(&config)?;
            let needle = filter.as_deref().map(str::to_lowercase);

            println!("📚 Skill catalog ({} entries)\n", engine.catalog().len());
            for entry in engine
                .catalog()
                .entries()
                .iter()
                .filter(|e| needle.as_ref().map_or(true, |n| e.skill.to_lowercase().contains(n)))
            {
                println!("  • {}", entry.skill);
                println!("    {}", entry.template);
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| TailorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(value) => cli::parse_output_format(value).map_err(TailorError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit_report(
    report: &TailoringReport,
    format: &OutputFormat,
    config: &Config,
    detailed: bool,
    save: Option<&Path>,
) -> Result<()> {
    let generator = ReportGenerator::with_options(
        config.output.color_output,
        detailed || config.output.detailed,
        true,
        true,
    );
    let content = generator.generate_report(report, format)?;
    println!("{}", content);

    if let Some(path) = save {
        // Saved console reports are written without escape codes
        let content = if matches!(format, OutputFormat::Console) && config.output.color_output {
            ReportGenerator::with_options(false, detailed || config.output.detailed, true, true)
                .generate_report(report, format)?
        } else {
            content
        };
        save_report_to_file(&content, path)?;
        println!("💾 Report saved to {}", path.display());
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
