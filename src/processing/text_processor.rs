//! Text normalization and whole-phrase matching

use crate::error::{Result, TailorError};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    horizontal_space: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let horizontal_space = Regex::new(r"[ \t\u{00A0}]+").expect("Invalid whitespace regex");

        Self { horizontal_space }
    }

    /// Normalize typography while keeping the line structure intact, since
    /// bullet-line extraction depends on it.
    pub fn normalize(&self, text: &str) -> String {
        let unified = self.normalize_unicode(text);

        unified
            .lines()
            .map(|line| self.horizontal_space.replace_all(line, " ").trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Count words using Unicode segmentation
    pub fn word_count(&self, text: &str) -> usize {
        text.unicode_words().count()
    }

    /// Normalize Unicode characters
    fn normalize_unicode(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'', // Smart quotes to regular quotes
                '\u{201C}' | '\u{201D}' => '"',  // Smart double quotes
                '\u{2013}' | '\u{2014}' => '-',  // En dash, em dash to hyphen
                '\u{2026}' => '.',               // Ellipsis to period
                '\r' => '\n',
                _ => c,
            })
            .collect()
    }
}

/// Case-insensitive search for a phrase bounded by non-word characters or the
/// ends of the text. Internal whitespace in the phrase matches any run of
/// whitespace.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    pattern: Regex,
}

impl PhraseMatcher {
    pub fn new(phrase: &str) -> Result<Self> {
        let body = phrase
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");

        if body.is_empty() {
            return Err(TailorError::InvalidInput("Cannot match an empty phrase".to_string()));
        }

        let pattern = Regex::new(&format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", body))
            .map_err(|e| TailorError::Processing(format!("Failed to build matcher for '{}': {}", phrase, e)))?;

        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
