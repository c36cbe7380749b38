//! Tailoring engine: extraction, gap detection, classification, synthesis and
//! document mutation wired together from configuration

use crate::config::Config;
use crate::error::Result;
use crate::llm::SentenceGenerator;
use crate::processing::catalog::SkillCatalog;
use crate::processing::classifier::{CategoryClassifier, RequirementsSummary};
use crate::processing::document::StructuredDocument;
use crate::processing::gap_detector::GapDetector;
use crate::processing::mutator::{DocumentMutator, InsertionRules, MutationReport, RowMapping, TermEmphasis};
use crate::processing::skill::{ExtractionResult, GapList};
use crate::processing::skill_extractor::SkillExtractor;
use crate::processing::synthesizer::{Bullet, BulletSynthesizer, Synthesis, SynthesisContext, SynthesisOptions};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::VOCABULARY;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything learned about the job description before any writing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub extraction: ExtractionResult,
    pub gaps: GapList,
    pub requirements: RequirementsSummary,
}

impl GapAnalysis {
    /// False when there is nothing to add: no gaps and no cloud services
    pub fn is_relevant(&self) -> bool {
        !self.gaps.is_empty() || !self.requirements.cloud_services.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringPlan {
    pub analysis: GapAnalysis,
    pub synthesis: Synthesis,
    pub processing_time_ms: u64,
}

impl TailoringPlan {
    /// Bullets for the summary and for the most recent role
    pub fn split_bullets(&self, summary_count: usize) -> (&[Bullet], &[Bullet]) {
        let at = summary_count.min(self.synthesis.bullets.len());
        self.synthesis.bullets.split_at(at)
    }
}

pub struct TailoringEngine {
    extractor: SkillExtractor,
    detector: GapDetector,
    classifier: CategoryClassifier,
    catalog: SkillCatalog,
    text_processor: TextProcessor,
    synthesis_options: SynthesisOptions,
    insertion_rules: InsertionRules,
    emphasis: Option<TermEmphasis>,
    skills_rows: Vec<RowMapping>,
    summary_bullets: usize,
}

impl TailoringEngine {
    pub fn new(config: &Config) -> Result<Self> {
        let extra_entries = match &config.catalog.path {
            Some(path) => {
                let entries = SkillCatalog::load_entries(path)?;
                info!("Loaded {} catalog entries from {}", entries.len(), path.display());
                entries
            }
            None => Vec::new(),
        };

        let emphasis = if config.document.emphasize_terms {
            TermEmphasis::new(
                VOCABULARY
                    .iter()
                    .map(|s| s.to_string())
                    .chain(config.extraction.extra_vocabulary.iter().cloned()),
            )
        } else {
            None
        };

        Ok(Self {
            extractor: SkillExtractor::with_vocabulary(
                &config.extraction.extra_vocabulary,
                config.extraction.extractor_options(),
            ),
            detector: GapDetector::new(config.document.max_gaps),
            classifier: CategoryClassifier::new(),
            catalog: SkillCatalog::with_extensions(extra_entries),
            text_processor: TextProcessor::new(),
            synthesis_options: SynthesisOptions {
                strict_generation: config.generation.strict,
                batch_size: config.generation.batch_size,
                min_words: config.generation.min_words,
                marker: config.document.bullet_marker.clone(),
            },
            insertion_rules: config.document.insertion_rules(),
            emphasis,
            skills_rows: config.document.skills_rows.clone(),
            summary_bullets: config.document.summary_bullets,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn strict_generation(&self) -> bool {
        self.synthesis_options.strict_generation
    }

    /// Extract, detect gaps against the document's paragraphs and classify
    pub fn analyze(&self, job_text: &str, document: &StructuredDocument) -> GapAnalysis {
        let job_text = self.text_processor.normalize(job_text);

        let extraction = self.extractor.extract_skills(&job_text);
        debug!("Extracted {} skills", extraction.len());

        let gaps = self.detector.detect(&extraction.skills, &document.paragraph_text());
        debug!("{} gaps ({} over the cap)", gaps.len(), gaps.dropped.len());

        let requirements = self.classifier.classify(&job_text);

        GapAnalysis {
            extraction,
            gaps,
            requirements,
        }
    }

    /// Plan using the catalog and generic fallbacks only
    pub async fn plan(&self, job_text: &str, document: &StructuredDocument) -> Result<TailoringPlan> {
        let start = Instant::now();
        let analysis = self.analyze(job_text, document);
        let synthesizer = BulletSynthesizer::new(&self.catalog, self.synthesis_options.clone());
        let synthesis = self
            .synthesize(&synthesizer, &analysis, job_text, document)
            .await?;

        Ok(TailoringPlan {
            analysis,
            synthesis,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Plan with `generator` covering skills the catalog misses
    pub async fn plan_with_generator<G: SentenceGenerator>(
        &self,
        job_text: &str,
        document: &StructuredDocument,
        generator: &G,
    ) -> Result<TailoringPlan> {
        let start = Instant::now();
        let analysis = self.analyze(job_text, document);
        let synthesizer =
            BulletSynthesizer::new(&self.catalog, self.synthesis_options.clone()).with_generator(generator);
        let synthesis = self
            .synthesize(&synthesizer, &analysis, job_text, document)
            .await?;

        Ok(TailoringPlan {
            analysis,
            synthesis,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn synthesize<G: SentenceGenerator>(
        &self,
        synthesizer: &BulletSynthesizer<'_, G>,
        analysis: &GapAnalysis,
        job_text: &str,
        document: &StructuredDocument,
    ) -> Result<Synthesis> {
        if analysis.gaps.is_empty() {
            return Ok(Synthesis::default());
        }

        let resume_text = document.paragraph_text();
        let context = SynthesisContext {
            job_text,
            resume_text: &resume_text,
        };
        synthesizer.synthesize(&analysis.gaps.skills, context).await
    }

    /// Write the plan's bullets and table tags into `document`
    pub fn apply(&self, plan: &TailoringPlan, document: &mut StructuredDocument) -> MutationReport {
        let (summary, role) = plan.split_bullets(self.summary_bullets);
        let mut mutator = DocumentMutator::new(&self.insertion_rules);
        if let Some(emphasis) = &self.emphasis {
            mutator = mutator.with_emphasis(emphasis);
        }

        mutator.apply(document, summary, role, &plan.analysis.requirements, &self.skills_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::DocumentFormat;

    const RESUME: &str = "\
## Summary
- Platform engineer

## Technical Skills
| Category | Skills |
|---|---|
| Cloud Technologies | Amazon Web Services |

## Experience
### Acme Corp 2024
- Ran Kubernetes clusters
";

    #[tokio::test]
    async fn test_plan_and_apply() {
        let engine = TailoringEngine::new(&Config::default()).unwrap();
        let mut document = StructuredDocument::parse(RESUME, DocumentFormat::Markdown);

        let plan = engine
            .plan("Requirements:\n- Terraform\n- Kubernetes\n- AWS Lambda", &document)
            .await
            .unwrap();

        assert!(plan.analysis.gaps.skills.iter().any(|s| s.as_str() == "Terraform"));
        assert!(!plan.analysis.gaps.skills.iter().any(|s| s.as_str() == "Kubernetes"));
        assert_eq!(plan.synthesis.bullets.len(), plan.analysis.gaps.len());
        assert!(plan.analysis.is_relevant());

        let report = engine.apply(&plan, &mut document);
        let rendered = document.render();

        assert_eq!(report.summary.requested, 0);
        assert_eq!(report.role.inserted, plan.synthesis.bullets.len());
        assert!(rendered.contains("**Terraform**"));
        assert!(rendered.contains("| Cloud Technologies | Amazon Web Services, Lambda |"));
    }

    #[tokio::test]
    async fn test_nothing_relevant() {
        let engine = TailoringEngine::new(&Config::default()).unwrap();
        let document = StructuredDocument::parse("Kubernetes\n", DocumentFormat::PlainText);

        let plan = engine.plan("kubernetes", &document).await.unwrap();

        assert!(plan.synthesis.bullets.is_empty());
        assert!(!plan.analysis.is_relevant());
    }

    #[test]
    fn test_split_bullets_clamps() {
        let plan = TailoringPlan {
            analysis: GapAnalysis {
                extraction: ExtractionResult::default(),
                gaps: GapList::default(),
                requirements: RequirementsSummary::default(),
            },
            synthesis: Synthesis::default(),
            processing_time_ms: 0,
        };

        let (summary, role) = plan.split_bullets(3);
        assert!(summary.is_empty());
        assert!(role.is_empty());
    }
}
