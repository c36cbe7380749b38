//! Configuration management for the resume tailor

use crate::error::{Result, TailorError};
use crate::llm::client::{ClientSettings, ANTHROPIC_API_URL};
use crate::llm::retry::RetryPolicy;
use crate::processing::gap_detector::DEFAULT_MAX_GAPS;
use crate::processing::mutator::{InsertionRules, RowMapping, DEFAULT_ROLE_WINDOW};
use crate::processing::skill_extractor::ExtractorOptions;
use crate::processing::synthesizer::{SynthesisOptions, DEFAULT_BULLET_MARKER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub generation: GenerationConfig,
    pub catalog: CatalogConfig,
    pub document: DocumentConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub min_term_length: usize,
    /// Keep contextual phrases only when they contain a vocabulary term
    pub strict_phrases: bool,
    pub extra_vocabulary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub enabled: bool,
    /// Abort instead of falling back to generic sentences
    pub strict: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub batch_size: usize,
    pub min_words: usize,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML file with extra `[[entries]]`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub bullet_marker: String,
    pub emphasize_terms: bool,
    /// Leading bullets placed in the summary; the rest go to the most recent role
    pub summary_bullets: usize,
    pub max_gaps: usize,
    pub summary_headings: Vec<String>,
    pub summary_anchor: Option<String>,
    pub experience_headings: Vec<String>,
    pub role_heading: Option<String>,
    pub role_year: Option<String>,
    pub role_anchors: Vec<String>,
    pub role_window: usize,
    pub skills_rows: Vec<RowMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Defaults to the resume's directory
    pub output_dir: Option<PathBuf>,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let options = ExtractorOptions::default();
        Self {
            min_term_length: options.min_term_length,
            strict_phrases: options.strict_phrases,
            extra_vocabulary: Vec::new(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        let synthesis = SynthesisOptions::default();
        Self {
            enabled: true,
            strict: false,
            endpoint: ANTHROPIC_API_URL.to_string(),
            model: "claude-sonnet-4-5".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_tokens: 2048,
            batch_size: synthesis.batch_size,
            min_words: synthesis.min_words,
            max_attempts: retry.max_attempts,
            base_delay_ms: retry.base_delay.as_millis() as u64,
            timeout_secs: retry.attempt_timeout.as_secs(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let rules = InsertionRules::default();
        Self {
            bullet_marker: DEFAULT_BULLET_MARKER.to_string(),
            emphasize_terms: true,
            summary_bullets: 0,
            max_gaps: DEFAULT_MAX_GAPS,
            summary_headings: rules.summary_headings,
            summary_anchor: None,
            experience_headings: rules.experience_headings,
            role_heading: None,
            role_year: None,
            role_anchors: Vec::new(),
            role_window: DEFAULT_ROLE_WINDOW,
            skills_rows: RowMapping::defaults(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            output_dir: None,
            detailed: false,
            color_output: true,
        }
    }
}

impl ExtractionConfig {
    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            min_term_length: self.min_term_length,
            strict_phrases: self.strict_phrases,
        }
    }
}

impl GenerationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            attempt_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            retry: self.retry_policy(),
        }
    }
}

impl DocumentConfig {
    pub fn insertion_rules(&self) -> InsertionRules {
        InsertionRules {
            summary_headings: self.summary_headings.clone(),
            summary_anchor: self.summary_anchor.clone(),
            experience_headings: self.experience_headings.clone(),
            role_heading: self.role_heading.clone(),
            role_year: self.role_year.clone(),
            role_anchors: self.role_anchors.clone(),
            role_window: self.role_window,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TailorError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.generation.batch_size == 0 {
            return Err(TailorError::Configuration("generation.batch_size must be at least 1".to_string()));
        }
        if self.generation.max_attempts == 0 {
            return Err(TailorError::Configuration("generation.max_attempts must be at least 1".to_string()));
        }
        if self.document.bullet_marker.trim().is_empty() {
            return Err(TailorError::Configuration("document.bullet_marker must not be blank".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::classifier::Category;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extraction.min_term_length, 2);
        assert!(config.extraction.strict_phrases);
        assert!(!config.generation.strict);
        assert_eq!(config.generation.batch_size, 10);
        assert_eq!(config.generation.min_words, 8);
        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.document.max_gaps, 20);
        assert_eq!(config.document.bullet_marker, "- ");
        assert_eq!(config.document.skills_rows[0].category, Category::CloudServices);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.generation.strict = true;
        config.document.role_heading = Some("Acme".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.generation.strict);
        assert_eq!(loaded.document.role_heading.as_deref(), Some("Acme"));
        assert_eq!(loaded.document.skills_rows, config.document.skills_rows);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nstrict = true\nbatch_size = 4\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.generation.strict);
        assert_eq!(config.generation.batch_size, 4);
        assert_eq!(config.generation.min_words, 8);
        assert_eq!(config.document.max_gaps, 20);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nbatch_size = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(TailorError::Configuration(_))));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let mut config = Config::default();
        config.generation.base_delay_ms = 250;
        config.generation.timeout_secs = 7;

        let policy = config.generation.retry_policy();
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(7));
    }
}
