//! Tailoring report: what was found, what was written, and where it came from

use crate::processing::classifier::RequirementsSummary;
use crate::processing::mutator::MutationReport;
use crate::processing::pipeline::TailoringPlan;
use crate::processing::synthesizer::{Bullet, BulletSource, UncoveredSkill};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringReport {
    pub metadata: ReportMetadata,

    /// Every skill pulled from the job description, longest first
    pub extracted_skills: Vec<String>,

    /// Extraction rules that could not run
    pub degraded_rules: Vec<String>,

    /// Skills missing from the resume, in extraction order
    pub gaps: Vec<String>,

    /// Missing skills beyond the gap cap
    pub dropped_gaps: Vec<String>,

    pub bullets: Vec<Bullet>,

    /// Skills that received a generic sentence, with the reason
    pub fallbacks: Vec<UncoveredSkill>,

    pub source_counts: SourceCounts,

    pub requirements: RequirementsSummary,

    /// Absent for analysis-only runs
    pub mutation: Option<MutationReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub processing_time_ms: u64,
    pub resume_path: String,
    pub job_path: String,
    pub output_path: Option<String>,
    pub generator: Option<String>,
    pub strict_generation: bool,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(resume_path: &str, job_path: &str) -> Self {
        Self {
            generated_at: SystemTime::now(),
            processing_time_ms: 0,
            resume_path: resume_path.to_string(),
            job_path: job_path.to_string(),
            output_path: None,
            generator: None,
            strict_generation: false,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub catalog: usize,
    pub partial_catalog: usize,
    pub generated: usize,
    pub fallback: usize,
}

impl SourceCounts {
    pub fn from_bullets(bullets: &[Bullet]) -> Self {
        let mut counts = Self::default();
        for bullet in bullets {
            match bullet.source {
                BulletSource::Catalog { .. } => counts.catalog += 1,
                BulletSource::PartialCatalog { .. } => counts.partial_catalog += 1,
                BulletSource::Generated { .. } => counts.generated += 1,
                BulletSource::Fallback => counts.fallback += 1,
            }
        }
        counts
    }
}

impl TailoringReport {
    pub fn from_plan(plan: &TailoringPlan, mutation: Option<MutationReport>, mut metadata: ReportMetadata) -> Self {
        let to_strings = |skills: &[crate::processing::skill::SkillTerm]| {
            skills.iter().map(|s| s.to_string()).collect::<Vec<_>>()
        };

        metadata.processing_time_ms = plan.processing_time_ms;

        Self {
            metadata,
            extracted_skills: to_strings(&plan.analysis.extraction.skills),
            degraded_rules: plan.analysis.extraction.degraded_rules.clone(),
            gaps: to_strings(&plan.analysis.gaps.skills),
            dropped_gaps: to_strings(&plan.analysis.gaps.dropped),
            bullets: plan.synthesis.bullets.clone(),
            fallbacks: plan.synthesis.fallbacks.clone(),
            source_counts: SourceCounts::from_bullets(&plan.synthesis.bullets),
            requirements: plan.analysis.requirements.clone(),
            mutation,
        }
    }

    pub fn inserted_bullets(&self) -> usize {
        self.mutation
            .as_ref()
            .map_or(0, |m| m.summary.inserted + m.role.inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill::SkillTerm;

    fn bullet(source: BulletSource) -> Bullet {
        Bullet {
            skill: SkillTerm::new("Helm").unwrap(),
            sentence: "Used Helm".to_string(),
            marker: "- ".to_string(),
            source,
        }
    }

    #[test]
    fn test_source_counts() {
        let bullets = vec![
            bullet(BulletSource::Catalog { key: "Helm".to_string() }),
            bullet(BulletSource::Fallback),
            bullet(BulletSource::Fallback),
            bullet(BulletSource::Generated {
                generator: "model".to_string(),
            }),
        ];

        assert_eq!(
            SourceCounts::from_bullets(&bullets),
            SourceCounts {
                catalog: 1,
                partial_catalog: 0,
                generated: 1,
                fallback: 2,
            }
        );
    }
}
