//! Detection of skills absent from a reference document

use crate::processing::skill::{GapList, SkillTerm};
use crate::processing::text_processor::PhraseMatcher;
use log::{debug, warn};

/// Default number of gaps carried into synthesis
pub const DEFAULT_MAX_GAPS: usize = 20;

pub struct GapDetector {
    max_gaps: usize,
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GAPS)
    }
}

impl GapDetector {
    pub fn new(max_gaps: usize) -> Self {
        Self { max_gaps }
    }

    /// Skills that do not occur as whole words/phrases in `reference_text`,
    /// in their original order.
    pub fn find_missing(&self, skills: &[SkillTerm], reference_text: &str) -> Vec<SkillTerm> {
        skills
            .iter()
            .filter(|skill| !is_present(skill, reference_text))
            .cloned()
            .collect()
    }

    /// `find_missing` followed by the gap cap
    pub fn detect(&self, skills: &[SkillTerm], reference_text: &str) -> GapList {
        let missing = self.find_missing(skills, reference_text);
        let gaps = GapList::bounded(missing, self.max_gaps);

        if !gaps.dropped.is_empty() {
            debug!(
                "Gap list capped at {}; {} further missing skills ignored",
                self.max_gaps,
                gaps.dropped.len()
            );
        }

        gaps
    }

    pub fn max_gaps(&self) -> usize {
        self.max_gaps
    }
}

fn is_present(skill: &SkillTerm, reference_text: &str) -> bool {
    match PhraseMatcher::new(skill.as_str()) {
        Ok(matcher) => matcher.is_match(reference_text),
        Err(e) => {
            warn!("Treating '{}' as missing: {}", skill, e);
            false
        }
    }
}
