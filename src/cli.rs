//! CLI interface for the resume tailor

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Add missing job-description skills to a resume")]
#[command(
    long_about = "Extract skills from a job description, find the ones your resume never mentions, and write achievement bullets for them back into a copy of the resume"
)]
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
    /// Write a tailored copy of the resume
    Tailor {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Directory for the tailored resume (defaults to the resume's directory)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Fail instead of using generic sentences when generation cannot cover a skill
        #[arg(long)]
        strict: bool,

        /// Use only the catalog and generic sentences
        #[arg(long)]
        no_generator: bool,

        /// Report format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report to a file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show extracted skills and bullet sources
        #[arg(long)]
        detailed: bool,

        /// Print the tailored resume instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show extracted skills, gaps and requirement categories without writing
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Report format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List skill catalog entries
    Catalog {
        /// Only entries whose skill contains this text
        filter: Option<String>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
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
    fn test_parse_tailor() {
        let cli = Cli::try_parse_from([
            "resume-tailor",
            "tailor",
            "--resume",
            "resume.md",
            "--job",
            "job.txt",
            "--strict",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Tailor { strict, no_generator, resume, .. } => {
                assert!(strict);
                assert!(!no_generator);
                assert_eq!(resume, PathBuf::from("resume.md"));
            }
            _ => panic!("expected tailor command"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_extension_validation() {
        assert!(validate_file_extension(Path::new("a.TXT"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("a.docx"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("a"), &["txt"]).is_err());
    }
}
