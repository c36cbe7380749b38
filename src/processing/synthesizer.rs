//! Bullet synthesis for gap skills
//!
//! Each gap skill gets exactly one sentence. Catalog templates are preferred
//! (exact key, then partial key); unmatched skills go to the text generator
//! in batches; anything still uncovered falls back to a generic template, or
//! aborts the whole synthesis in strict mode.

use crate::error::{Result, TailorError};
use crate::llm::{GenerationRequest, GeneratorError, NoGenerator, SentenceGenerator};
use crate::processing::catalog::{MatchKind, SkillCatalog};
use crate::processing::skill::SkillTerm;
use crate::processing::text_processor::TextProcessor;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BULLET_MARKER: &str = "- ";

/// Leading bullet markers, enumerators and emphasis on generated lines
static LINE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:[-*+\u{2022}\u{25AA}\u{25CF}]|\d{1,3}[.)]|\(\d{1,3}\))\s*)*(?:\*\*|__)?")
        .expect("Invalid line prefix regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BulletSource {
    Catalog { key: String },
    PartialCatalog { key: String },
    Generated { generator: String },
    Fallback,
}

/// One synthesized sentence covering one gap skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub skill: SkillTerm,
    pub sentence: String,
    pub marker: String,
    pub source: BulletSource,
}

impl Bullet {
    /// Sentence with its leading marker
    pub fn render(&self) -> String {
        format!("{}{}", self.marker, self.sentence)
    }
}

impl fmt::Display for Bullet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UncoveredReason {
    NoGenerator,
    GeneratorFailed { message: String },
    InsufficientOutput,
}

impl fmt::Display for UncoveredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UncoveredReason::NoGenerator => write!(f, "no text generator configured"),
            UncoveredReason::GeneratorFailed { message } => write!(f, "generator failed: {}", message),
            UncoveredReason::InsufficientOutput => write!(f, "generator returned too few usable sentences"),
        }
    }
}

/// A skill neither the catalog nor the generator could cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncoveredSkill {
    pub skill: SkillTerm,
    pub reason: UncoveredReason,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Synthesis {
    /// One bullet per gap skill, in gap order
    pub bullets: Vec<Bullet>,
    /// Skills that ended on the generic fallback, and why (lenient mode)
    pub fallbacks: Vec<UncoveredSkill>,
}

impl Synthesis {
    pub fn count_by(&self, predicate: impl Fn(&BulletSource) -> bool) -> usize {
        self.bullets.iter().filter(|b| predicate(&b.source)).count()
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Abort instead of falling back when the generator cannot cover a skill
    pub strict_generation: bool,
    pub batch_size: usize,
    /// Generated lines with fewer words are discarded
    pub min_words: usize,
    pub marker: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            strict_generation: false,
            batch_size: 10,
            min_words: 8,
            marker: DEFAULT_BULLET_MARKER.to_string(),
        }
    }
}

/// Context handed to the generator for tone matching
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub job_text: &'a str,
    pub resume_text: &'a str,
}

pub struct BulletSynthesizer<'a, G = NoGenerator> {
    catalog: &'a SkillCatalog,
    generator: Option<&'a G>,
    options: SynthesisOptions,
    text_processor: TextProcessor,
}

impl<'a> BulletSynthesizer<'a, NoGenerator> {
    pub fn new(catalog: &'a SkillCatalog, options: SynthesisOptions) -> Self {
        Self {
            catalog,
            generator: None,
            options,
            text_processor: TextProcessor::new(),
        }
    }
}

impl<'a, G: SentenceGenerator> BulletSynthesizer<'a, G> {
    /// Use `generator` for skills the catalog cannot cover
    pub fn with_generator<H: SentenceGenerator>(self, generator: &'a H) -> BulletSynthesizer<'a, H> {
        BulletSynthesizer {
            catalog: self.catalog,
            generator: Some(generator),
            options: self.options,
            text_processor: self.text_processor,
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Produce one bullet per gap, in gap order
    pub async fn synthesize(&self, gaps: &[SkillTerm], context: SynthesisContext<'_>) -> Result<Synthesis> {
        let mut sentences: Vec<Option<(String, BulletSource)>> = Vec::with_capacity(gaps.len());
        let mut unmatched: Vec<usize> = Vec::new();

        for (index, skill) in gaps.iter().enumerate() {
            match self.catalog.lookup(skill.as_str()) {
                Some(found) => {
                    let source = match found.kind {
                        MatchKind::Exact => BulletSource::Catalog {
                            key: found.entry.skill.clone(),
                        },
                        MatchKind::Partial => BulletSource::PartialCatalog {
                            key: found.entry.skill.clone(),
                        },
                    };
                    sentences.push(Some((found.entry.template.clone(), source)));
                }
                None => {
                    sentences.push(None);
                    unmatched.push(index);
                }
            }
        }

        debug!(
            "{} of {} gap skills matched the catalog",
            gaps.len() - unmatched.len(),
            gaps.len()
        );

        let mut uncovered = Vec::new();
        if !unmatched.is_empty() {
            match self.generator {
                Some(generator) => {
                    for batch in unmatched.chunks(self.options.batch_size.max(1)) {
                        let failures = self.generate_batch(generator, gaps, batch, context, &mut sentences).await;
                        uncovered.extend(failures);
                    }
                }
                None => {
                    uncovered.extend(unmatched.iter().map(|&i| UncoveredSkill {
                        skill: gaps[i].clone(),
                        reason: UncoveredReason::NoGenerator,
                    }));
                }
            }
        }

        if !uncovered.is_empty() {
            if self.options.strict_generation {
                return Err(TailorError::SynthesisAborted(uncovered));
            }
            info!("{} skills fall back to generic sentences", uncovered.len());
        }

        let bullets = gaps
            .iter()
            .zip(sentences)
            .map(|(skill, slot)| {
                let (sentence, source) =
                    slot.unwrap_or_else(|| (generic_sentence(skill.as_str()), BulletSource::Fallback));
                Bullet {
                    skill: skill.clone(),
                    sentence,
                    marker: self.options.marker.clone(),
                    source,
                }
            })
            .collect();

        Ok(Synthesis {
            bullets,
            fallbacks: uncovered,
        })
    }

    /// Fill the slots of one batch; returns the skills left uncovered
    async fn generate_batch(
        &self,
        generator: &G,
        gaps: &[SkillTerm],
        batch: &[usize],
        context: SynthesisContext<'_>,
        sentences: &mut [Option<(String, BulletSource)>],
    ) -> Vec<UncoveredSkill> {
        let skills: Vec<String> = batch.iter().map(|&i| gaps[i].to_string()).collect();
        let request = GenerationRequest {
            skills: &skills,
            job_text: context.job_text,
            resume_text: context.resume_text,
        };

        let lines = match generator.generate(&request).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Generator failed for {} skills: {}", skills.len(), e);
                let reason = match e {
                    GeneratorError::Unavailable => UncoveredReason::NoGenerator,
                    other => UncoveredReason::GeneratorFailed {
                        message: other.to_string(),
                    },
                };
                return batch
                    .iter()
                    .map(|&i| UncoveredSkill {
                        skill: gaps[i].clone(),
                        reason: reason.clone(),
                    })
                    .collect();
            }
        };

        let generated = parse_generated_lines(&self.text_processor, &lines, self.options.min_words);
        if generated.len() < batch.len() {
            warn!(
                "Generator returned {} usable sentences for {} skills",
                generated.len(),
                batch.len()
            );
        }

        let source = BulletSource::Generated {
            generator: generator.name(),
        };
        let mut generated = generated.into_iter();
        let mut uncovered = Vec::new();

        for &index in batch {
            match generated.next() {
                Some(sentence) => sentences[index] = Some((sentence, source.clone())),
                None => uncovered.push(UncoveredSkill {
                    skill: gaps[index].clone(),
                    reason: UncoveredReason::InsufficientOutput,
                }),
            }
        }

        uncovered
    }
}

/// Strip markers, numbering and emphasis from generator output and keep the
/// lines long enough to be real sentences
pub fn parse_generated_lines(processor: &TextProcessor, lines: &[String], min_words: usize) -> Vec<String> {
    lines
        .iter()
        .flat_map(|chunk| chunk.lines())
        .map(|line| {
            let stripped = LINE_PREFIX.replace(line, "");
            stripped
                .replace("**", "")
                .replace("__", "")
                .trim()
                .trim_matches('"')
                .trim()
                .to_string()
        })
        .filter(|line| processor.word_count(line) >= min_words)
        .collect()
}

/// Generic sentence for a skill no template covers, picked by keyword sniffing
pub fn generic_sentence(skill: &str) -> String {
    let lower = skill.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has_any(&["monitor", "observab", "logging", "tracing", "alert", "telemetry"]) {
        format!(
            "Implemented {} to strengthen monitoring and observability, improving incident detection across production systems",
            skill
        )
    } else if has_any(&["security", "compliance", "governance", "audit", "policy", "policies"]) {
        format!(
            "Applied {} to strengthen security posture and maintain compliance across cloud environments",
            skill
        )
    } else if has_any(&["pipeline", "ci/cd", "deploy", "release"]) {
        format!(
            "Integrated {} into delivery pipelines to streamline automated build, test, and release workflows",
            skill
        )
    } else if has_any(&["database", "sql", "data "]) {
        format!(
            "Managed {} workloads in production with a focus on reliability, backups, and performance tuning",
            skill
        )
    } else {
        format!("Demonstrated hands-on experience with {} in production environments", skill)
    }
}
