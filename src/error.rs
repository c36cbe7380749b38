//! Error handling for the resume tailor application

use crate::llm::GeneratorError;
use crate::processing::synthesizer::UncoveredSkill;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text generation error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Bullet synthesis aborted, {} skill(s) could not be covered: {}", .0.len(), describe_uncovered(.0))]
    SynthesisAborted(Vec<UncoveredSkill>),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, TailorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for TailorError {
    fn from(err: anyhow::Error) -> Self {
        TailorError::Processing(format!("{:#}", err))
    }
}

fn describe_uncovered(skills: &[UncoveredSkill]) -> String {
    skills
        .iter()
        .map(|s| format!("{} ({})", s.skill, s.reason))
        .collect::<Vec<_>>()
        .join(", ")
}
