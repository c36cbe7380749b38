//! Skill extraction from free-text job descriptions
//!
//! Several heuristics run over the same text and their candidates are merged:
//! vocabulary hits, phrases after experience/action cue words, phrases before
//! "tools"/"frameworks"/"platforms", runs of capitalized words, and vocabulary
//! terms on bullet lines. The heuristics over-collect on purpose; gap
//! detection and catalog matching filter what matters downstream.

use crate::processing::skill::{ExtractionResult, SkillTerm};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::VOCABULARY;
use aho_corasick::AhoCorasick;
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeSet;

/// Phrase body shared by the contextual patterns: 3 to 80 characters on one line
const PHRASE: &str = r"([A-Za-z][A-Za-z0-9 \t\-/+.()]{2,79}?)";

/// Where a contextual phrase ends
const TERMINATOR: &str = r"[ \t]*(?:,|;|:|\.(?:\s|$)|\band\b|\bor\b|\r?\n|$)";

const CAPITALIZED_STOPLIST: &[&str] = &["The", "This", "Job", "Role", "Must", "Should", "Will", "Have"];

const STOPWORDS: &[&str] = &["a", "an", "the", "and", "or"];

/// Words trimmed from the edges of captured phrases
const CONNECTORS: &[&str] = &[
    "a", "an", "the", "and", "or", "with", "in", "of", "to", "for", "on", "at", "by", "our", "your",
    "their", "using", "including",
];

const MIN_PHRASE_LENGTH: usize = 3;
const MAX_PHRASE_LENGTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    Vocabulary,
    ContextualPhrase,
    ToolSuffix,
    CapitalizedTerm,
    BulletLine,
}

impl ExtractionRule {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionRule::Vocabulary => "vocabulary",
            ExtractionRule::ContextualPhrase => "contextual-phrase",
            ExtractionRule::ToolSuffix => "tool-suffix",
            ExtractionRule::CapitalizedTerm => "capitalized-term",
            ExtractionRule::BulletLine => "bullet-line",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Candidates shorter than this many characters are discarded
    pub min_term_length: usize,
    /// Keep contextual phrases only when they mention a vocabulary term
    pub strict_phrases: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            min_term_length: 2,
            strict_phrases: true,
        }
    }
}

pub struct SkillExtractor {
    vocabulary: Vec<String>,
    vocabulary_matcher: Option<AhoCorasick>,
    contextual_patterns: Vec<Regex>,
    tool_suffix: Option<Regex>,
    capitalized: Option<Regex>,
    bullet_line: Option<Regex>,
    degraded: Vec<ExtractionRule>,
    text_processor: TextProcessor,
    options: ExtractorOptions,
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillExtractor {
    /// Create an extractor over the builtin vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(&[], ExtractorOptions::default())
    }

    /// Create an extractor with additional vocabulary terms
    pub fn with_vocabulary(additional_terms: &[String], options: ExtractorOptions) -> Self {
        let mut vocabulary: Vec<String> = VOCABULARY.iter().map(|s| s.to_string()).collect();
        for term in additional_terms {
            let term = term.trim();
            if !term.is_empty() && !vocabulary.iter().any(|v| v == term) {
                vocabulary.push(term.to_string());
            }
        }

        let mut degraded = Vec::new();

        let vocabulary_matcher = match AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&vocabulary)
        {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                warn!("Vocabulary matcher unavailable: {}", e);
                degraded.push(ExtractionRule::Vocabulary);
                None
            }
        };

        let contextual_sources = [
            format!(
                r"(?i)\b(?:experience|expertise|proficiency|proficient|skills?|knowledge|familiarity)\b[ \t\w]*?\b(?:in|with)[ \t]+{}{}",
                PHRASE, TERMINATOR
            ),
            format!(
                r"(?i)\b(?:ability|capable|expertise)\b[ \t\w]*?\b(?:to|in|with)[ \t]+{}{}",
                PHRASE, TERMINATOR
            ),
            format!(
                r"(?i)\b(?:using|utilize|utilizing|implement|implementing|deploy|deploying|manage|managing|configure|configuring|design|designing|build|building|develop|developing)[ \t]+{}{}",
                PHRASE, TERMINATOR
            ),
        ];
        let contextual_patterns: Vec<Regex> = contextual_sources
            .iter()
            .filter_map(|source| compile(ExtractionRule::ContextualPhrase, source))
            .collect();
        if contextual_patterns.len() < contextual_sources.len() {
            degraded.push(ExtractionRule::ContextualPhrase);
        }

        let tool_suffix = compile(
            ExtractionRule::ToolSuffix,
            r"(?i)\b((?:[A-Za-z0-9][A-Za-z0-9\-/+.]*[ \t]+){0,2}[A-Za-z0-9][A-Za-z0-9\-/+.]*)[ \t]+(?:tools?|frameworks?|platforms?)\b",
        );
        let capitalized = compile(
            ExtractionRule::CapitalizedTerm,
            r"\b([A-Z][a-zA-Z0-9\-/+.]*(?:[ \t]+[A-Z][a-zA-Z0-9\-/+.]*)*)\b",
        );
        let bullet_line = compile(
            ExtractionRule::BulletLine,
            r"^[ \t]*(?:[-*+\u{2022}\u{25AA}\u{25E6}\u{2023}\u{25CF}]|\d{1,3}[.)])[ \t]+\S",
        );

        for (rule, pattern) in [
            (ExtractionRule::ToolSuffix, &tool_suffix),
            (ExtractionRule::CapitalizedTerm, &capitalized),
            (ExtractionRule::BulletLine, &bullet_line),
        ] {
            if pattern.is_none() {
                degraded.push(rule);
            }
        }

        Self {
            vocabulary,
            vocabulary_matcher,
            contextual_patterns,
            tool_suffix,
            capitalized,
            bullet_line,
            degraded,
            text_processor: TextProcessor::new(),
            options,
        }
    }

    /// Extract a deduplicated, longest-first set of candidate skills
    pub fn extract_skills(&self, text: &str) -> ExtractionResult {
        let degraded_rules = self.degraded.iter().map(|r| r.name().to_string()).collect();

        if text.trim().is_empty() {
            return ExtractionResult {
                skills: Vec::new(),
                degraded_rules,
            };
        }

        let text = self.text_processor.normalize(text);
        let mut candidates: Vec<String> = Vec::new();

        let vocabulary_hits = self.vocabulary_hits(&text);
        debug!("Vocabulary matched {} terms", vocabulary_hits.len());
        candidates.extend(vocabulary_hits);

        let phrases = self.contextual_phrases(&text);
        debug!("Contextual patterns captured {} phrases", phrases.len());
        candidates.extend(phrases);

        let tools = self.tool_phrases(&text);
        debug!("Tool/framework/platform suffixes captured {} phrases", tools.len());
        candidates.extend(tools);

        let capitalized = self.capitalized_terms(&text);
        debug!("Capitalized-term heuristic captured {} terms", capitalized.len());
        candidates.extend(capitalized);

        let listed = self.bullet_line_terms(&text);
        debug!("Bullet lines contributed {} vocabulary terms", listed.len());
        candidates.extend(listed);

        ExtractionResult {
            skills: self.finalize(candidates),
            degraded_rules,
        }
    }

    /// Canonical vocabulary terms appearing in `text` as whole words
    pub fn vocabulary_hits(&self, text: &str) -> Vec<String> {
        let Some(matcher) = &self.vocabulary_matcher else {
            return Vec::new();
        };

        let mut found = vec![false; self.vocabulary.len()];
        for mat in matcher.find_overlapping_iter(text) {
            if is_bounded(text, mat.start(), mat.end()) {
                found[mat.pattern().as_usize()] = true;
            }
        }

        self.vocabulary
            .iter()
            .zip(found)
            .filter(|(_, hit)| *hit)
            .map(|(term, _)| term.clone())
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn contextual_phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();

        for pattern in &self.contextual_patterns {
            for cap in pattern.captures_iter(text) {
                let Some(raw) = cap.get(1) else { continue };
                let phrase = trim_connectors(raw.as_str());
                let length = phrase.chars().count();

                if !(MIN_PHRASE_LENGTH..=MAX_PHRASE_LENGTH).contains(&length) {
                    continue;
                }
                if self.options.strict_phrases && self.vocabulary_hits(&phrase).is_empty() {
                    continue;
                }
                phrases.push(phrase);
            }
        }

        phrases
    }

    fn tool_phrases(&self, text: &str) -> Vec<String> {
        let Some(pattern) = &self.tool_suffix else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| trim_connectors(&tail_after_connector(m.as_str())))
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }

    fn capitalized_terms(&self, text: &str) -> Vec<String> {
        let Some(pattern) = &self.capitalized else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|term| !CAPITALIZED_STOPLIST.contains(&term.as_str()))
            .collect()
    }

    fn bullet_line_terms(&self, text: &str) -> Vec<String> {
        let Some(pattern) = &self.bullet_line else {
            return Vec::new();
        };

        text.lines()
            .filter(|line| pattern.is_match(line))
            .flat_map(|line| self.vocabulary_hits(line))
            .collect()
    }

    fn finalize(&self, candidates: Vec<String>) -> Vec<SkillTerm> {
        let unique: BTreeSet<SkillTerm> = candidates
            .iter()
            .filter_map(|candidate| SkillTerm::new(candidate))
            .filter(|term| term.len() >= self.options.min_term_length)
            .filter(|term| !STOPWORDS.contains(&term.to_lowercase().as_str()))
            .collect();

        let mut skills: Vec<SkillTerm> = unique.into_iter().collect();
        skills.sort_by(|a, b| b.len().cmp(&a.len()));
        skills
    }
}

fn compile(rule: ExtractionRule, source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Extraction rule '{}' disabled: {}", rule.name(), e);
            None
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the byte range is not glued to word characters on either side
pub(crate) fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_connector(word: &str) -> bool {
    CONNECTORS.contains(&word.to_lowercase().as_str())
}

/// Strip punctuation and connector words from both ends of a phrase
fn trim_connectors(phrase: &str) -> String {
    let cleaned = phrase.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':'));
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let start = words.iter().position(|w| !is_connector(w)).unwrap_or(words.len());
    let end = words.iter().rposition(|w| !is_connector(w)).map_or(start, |i| i + 1);

    words[start..end.max(start)]
        .join(" ")
        .trim_end_matches(|c: char| c == ',' || c == '.')
        .to_string()
}

/// Keep the words after the last connector word ("experience with CI/CD" -> "CI/CD")
fn tail_after_connector(phrase: &str) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    match words.iter().rposition(|w| is_connector(w)) {
        Some(i) => words[i + 1..].join(" "),
        None => words.join(" "),
    }
}
