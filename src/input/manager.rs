//! Input manager for handling different file types

use crate::error::{Result, TailorError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{DocumentFormat, StructuredDocument};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Plain text of any supported file, Markdown flattened
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let file_type = self.detect_file_type(path)?;

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(TailorError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load a resume with its layout intact so it can be rewritten
    pub async fn load_document(&self, path: &Path) -> Result<StructuredDocument> {
        let file_type = self.detect_file_type(path)?;
        if !file_type.is_editable() {
            return Err(TailorError::UnsupportedFormat(format!(
                "{} can be analyzed but not rewritten; use a .txt or .md resume",
                path.display()
            )));
        }

        let source = tokio::fs::read_to_string(path).await?;
        info!("Loaded {} ({} bytes)", path.display(), source.len());
        Ok(StructuredDocument::parse(&source, DocumentFormat::from_file_type(&file_type)))
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        if !path.exists() {
            return Err(TailorError::InvalidInput(format!("File does not exist: {}", path.display())));
        }

        FileType::from_path(path)
            .ok_or_else(|| TailorError::InvalidInput(format!("File has no extension: {}", path.display())))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
