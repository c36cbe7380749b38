//! Skill terms and the collections built from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized phrase naming a technology, tool or methodology.
///
/// Identity is the exact (case-sensitive) string; comparisons against other
/// text are case-insensitive and happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTerm(String);

impl SkillTerm {
    /// Trim whitespace and strip trailing commas/periods. Returns `None` when
    /// nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_end_matches(|c: char| c == ',' || c == '.' || c.is_whitespace())
            .trim();

        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for SkillTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SkillTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated skills pulled out of one job description, longest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub skills: Vec<SkillTerm>,
    /// Extraction rules that could not run and contributed nothing
    pub degraded_rules: Vec<String>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.as_str() == skill)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillTerm> {
        self.skills.iter()
    }
}

/// Skills missing from the reference document, capped to bound how much
/// gets written into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapList {
    pub skills: Vec<SkillTerm>,
    /// Missing skills left out because of the cap
    pub dropped: Vec<SkillTerm>,
}

impl GapList {
    pub fn bounded(mut missing: Vec<SkillTerm>, max_gaps: usize) -> Self {
        let dropped = if missing.len() > max_gaps {
            missing.split_off(max_gaps)
        } else {
            Vec::new()
        };

        Self {
            skills: missing,
            dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_term_normalization() {
        assert_eq!(SkillTerm::new("  Terraform.,").unwrap().as_str(), "Terraform");
        assert_eq!(SkillTerm::new("Node.js").unwrap().as_str(), "Node.js");
        assert_eq!(SkillTerm::new("CI/CD , ").unwrap().as_str(), "CI/CD");
        assert!(SkillTerm::new(" ., ").is_none());
    }

    #[test]
    fn test_gap_list_cap() {
        let missing: Vec<SkillTerm> = (0..25)
            .map(|i| SkillTerm::new(&format!("Skill{}", i)).unwrap())
            .collect();

        let gaps = GapList::bounded(missing, 20);
        assert_eq!(gaps.len(), 20);
        assert_eq!(gaps.dropped.len(), 5);
        assert_eq!(gaps.skills[0].as_str(), "Skill0");
        assert_eq!(gaps.dropped[0].as_str(), "Skill20");
    }

    #[test]
    fn test_gap_list_under_cap_keeps_everything() {
        let missing = vec![SkillTerm::new("Helm").unwrap()];
        let gaps = GapList::bounded(missing, 20);
        assert_eq!(gaps.len(), 1);
        assert!(gaps.dropped.is_empty());
    }
}
