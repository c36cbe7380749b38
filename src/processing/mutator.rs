//! Writes synthesized bullets and category tags back into a structured document

use crate::processing::classifier::{Category, RequirementsSummary};
use crate::processing::document::{DocumentFormat, Paragraph, StructuredDocument};
use crate::processing::skill_extractor::is_bounded;
use crate::processing::synthesizer::Bullet;
use aho_corasick::{AhoCorasick, MatchKind as AcMatchKind};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Paragraphs scanned after a role heading when looking for the insertion point
pub const DEFAULT_ROLE_WINDOW: usize = 60;

/// Skills-table row label and the category whose tags are appended to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowMapping {
    pub label: String,
    pub category: Category,
}

impl RowMapping {
    pub fn new(label: &str, category: Category) -> Self {
        Self {
            label: label.to_string(),
            category,
        }
    }

    pub fn defaults() -> Vec<RowMapping> {
        vec![
            RowMapping::new("Cloud Technologies", Category::CloudServices),
            RowMapping::new("CI/CD Tools", Category::CicdTools),
            RowMapping::new("Databases", Category::Databases),
            RowMapping::new("Containers", Category::Containers),
            RowMapping::new("Monitoring", Category::Monitoring),
            RowMapping::new("Messaging", Category::Messaging),
        ]
    }
}

/// Where bullets go in the document
#[derive(Debug, Clone)]
pub struct InsertionRules {
    pub summary_headings: Vec<String>,
    /// Paragraph fragment that marks the summary insertion point directly
    pub summary_anchor: Option<String>,
    pub experience_headings: Vec<String>,
    /// Fragment of the most recent role's heading line; first role under an
    /// experience heading when unset
    pub role_heading: Option<String>,
    pub role_year: Option<String>,
    /// Insert after the first paragraph in the role window containing one of these
    pub role_anchors: Vec<String>,
    pub role_window: usize,
}

impl Default for InsertionRules {
    fn default() -> Self {
        Self {
            summary_headings: vec![
                "Summary".to_string(),
                "Professional Summary".to_string(),
                "Profile".to_string(),
            ],
            summary_anchor: None,
            experience_headings: vec![
                "Experience".to_string(),
                "Professional Experience".to_string(),
                "Work Experience".to_string(),
            ],
            role_heading: None,
            role_year: None,
            role_anchors: Vec::new(),
            role_window: DEFAULT_ROLE_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionTarget {
    Summary,
    Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertionOutcome {
    pub target: InsertionTarget,
    pub requested: usize,
    pub inserted: usize,
    /// Paragraph index the bullets were placed after
    pub after_paragraph: Option<usize>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableUpdate {
    pub row: String,
    pub added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationReport {
    pub summary: InsertionOutcome,
    pub role: InsertionOutcome,
    pub table_updates: Vec<TableUpdate>,
}

/// Wraps known technology terms in `**`, longest term at the earliest position
pub struct TermEmphasis {
    matcher: AhoCorasick,
}

impl TermEmphasis {
    pub fn new<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        match AhoCorasick::builder().match_kind(AcMatchKind::LeftmostLongest).build(terms) {
            Ok(matcher) => Some(Self { matcher }),
            Err(e) => {
                warn!("Term emphasis disabled: {}", e);
                None
            }
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        let mut last = 0;

        for m in self.matcher.find_iter(text) {
            if !is_bounded(text, m.start(), m.end()) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            out.push_str("**");
            out.push_str(&text[m.start()..m.end()]);
            out.push_str("**");
            last = m.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

pub struct DocumentMutator<'a> {
    rules: &'a InsertionRules,
    emphasis: Option<&'a TermEmphasis>,
}

impl<'a> DocumentMutator<'a> {
    pub fn new(rules: &'a InsertionRules) -> Self {
        Self { rules, emphasis: None }
    }

    /// Emphasize technology terms in inserted bullets (Markdown documents only)
    pub fn with_emphasis(mut self, emphasis: &'a TermEmphasis) -> Self {
        self.emphasis = Some(emphasis);
        self
    }

    /// Insert both bullet groups and update the skills table
    pub fn apply(
        &self,
        document: &mut StructuredDocument,
        summary_bullets: &[Bullet],
        role_bullets: &[Bullet],
        requirements: &RequirementsSummary,
        rows: &[RowMapping],
    ) -> MutationReport {
        let paragraphs: Vec<Paragraph> = document.paragraphs().into_iter().cloned().collect();

        let summary_at = self.summary_insertion_point(&paragraphs);
        let role_at = self.role_insertion_point(&paragraphs);

        let mut summary = outcome(InsertionTarget::Summary, summary_bullets.len(), &summary_at);
        let mut role = outcome(InsertionTarget::Role, role_bullets.len(), &role_at);

        let mut pending: Vec<(usize, &[Bullet], &mut InsertionOutcome)> = Vec::new();
        if let Ok(index) = summary_at {
            pending.push((index, summary_bullets, &mut summary));
        }
        if let Ok(index) = role_at {
            pending.push((index, role_bullets, &mut role));
        }

        // Later positions first so earlier indexes stay valid
        pending.sort_by(|a, b| b.0.cmp(&a.0));
        for (index, bullets, result) in pending {
            if bullets.is_empty() {
                continue;
            }
            let indent = paragraphs[index].indent().to_string();
            let new_paragraphs = bullets
                .iter()
                .map(|b| Paragraph::new(format!("{}{}{}", indent, b.marker, self.render_sentence(document, &b.sentence))))
                .collect();
            document.insert_after_paragraph(index, new_paragraphs);
            result.inserted = bullets.len();
            info!("Inserted {} bullets after paragraph {}", bullets.len(), index);
        }

        let table_updates = update_skills_table(document, requirements, rows);

        MutationReport {
            summary,
            role,
            table_updates,
        }
    }

    fn render_sentence(&self, document: &StructuredDocument, sentence: &str) -> String {
        match (document.format(), self.emphasis) {
            (DocumentFormat::Markdown, Some(emphasis)) => emphasis.apply(sentence),
            _ => sentence.to_string(),
        }
    }

    /// Paragraph index to insert summary bullets after
    pub fn summary_insertion_point(&self, paragraphs: &[Paragraph]) -> Result<usize, String> {
        if let Some(anchor) = &self.rules.summary_anchor {
            return paragraphs
                .iter()
                .position(|p| p.content().contains(anchor.as_str()))
                .ok_or_else(|| format!("summary anchor \"{}\" not found", anchor));
        }

        let heading = find_heading(paragraphs, &self.rules.summary_headings)
            .ok_or_else(|| "no summary heading found".to_string())?;
        let end = section_end(paragraphs, heading);

        Ok(last_bullet_of_first_run(paragraphs, heading + 1, end).unwrap_or(heading))
    }

    /// Paragraph index to insert role bullets after
    pub fn role_insertion_point(&self, paragraphs: &[Paragraph]) -> Result<usize, String> {
        let start = match &self.rules.role_heading {
            Some(heading) => paragraphs
                .iter()
                .position(|p| {
                    let content = p.content();
                    content.contains(heading.as_str())
                        && self.rules.role_year.as_deref().map_or(true, |year| content.contains(year))
                })
                .ok_or_else(|| match &self.rules.role_year {
                    Some(year) => format!("role \"{}\" ({}) not found", heading, year),
                    None => format!("role \"{}\" not found", heading),
                })?,
            None => {
                let experience = find_heading(paragraphs, &self.rules.experience_headings)
                    .ok_or_else(|| "no experience heading found".to_string())?;
                paragraphs
                    .iter()
                    .enumerate()
                    .skip(experience + 1)
                    .find(|(_, p)| !p.is_blank())
                    .map(|(i, _)| i)
                    .ok_or_else(|| "experience section is empty".to_string())?
            }
        };

        let end = (start + self.rules.role_window).min(paragraphs.len());
        debug!("Role section starts at paragraph {}, scanning to {}", start, end);

        if !self.rules.role_anchors.is_empty() {
            if let Some(anchor) = (start..end).find(|&j| {
                let content = paragraphs[j].content();
                self.rules.role_anchors.iter().any(|a| content.contains(a.as_str()))
            }) {
                return Ok(anchor);
            }
        }

        last_bullet_of_first_run(paragraphs, start + 1, end)
            .ok_or_else(|| "no bullet list found under the most recent role".to_string())
    }
}

fn outcome(target: InsertionTarget, requested: usize, at: &Result<usize, String>) -> InsertionOutcome {
    InsertionOutcome {
        target,
        requested,
        inserted: 0,
        after_paragraph: at.as_ref().ok().copied(),
        note: at.as_ref().err().cloned(),
    }
}

/// Append missing category tags to matching skills-table rows.
///
/// A row matches the first mapping whose label occurs in its first cell; a
/// tag counts as present when it already occurs in the second cell, ignoring
/// case.
pub fn update_skills_table(
    document: &mut StructuredDocument,
    requirements: &RequirementsSummary,
    rows: &[RowMapping],
) -> Vec<TableUpdate> {
    let mut updates = Vec::new();

    for table in document.tables_mut() {
        for row in table.rows.iter_mut().filter(|r| !r.is_separator()) {
            let (Some(label), Some(content)) = (row.cell(0), row.cell(1)) else {
                continue;
            };
            let label_lower = label.to_lowercase();
            let Some(mapping) = rows
                .iter()
                .find(|m| label_lower.contains(&m.label.to_lowercase()))
            else {
                continue;
            };

            let content_lower = content.to_lowercase();
            let added: Vec<String> = requirements
                .tags(mapping.category)
                .iter()
                .filter(|tag| !content_lower.contains(&tag.to_lowercase()))
                .cloned()
                .collect();
            if added.is_empty() {
                continue;
            }

            let updated = if content.is_empty() {
                added.join(", ")
            } else {
                format!("{}, {}", content, added.join(", "))
            };
            debug!("Skills row '{}' gains {}", mapping.label, added.join(", "));
            row.set_cell(1, updated);
            updates.push(TableUpdate {
                row: mapping.label.clone(),
                added,
            });
        }
    }

    updates
}

fn find_heading(paragraphs: &[Paragraph], names: &[String]) -> Option<usize> {
    paragraphs.iter().position(|p| {
        let text = p.heading_text();
        !p.is_bullet() && names.iter().any(|name| text.eq_ignore_ascii_case(name))
    })
}

/// Markdown heading, or a short all-caps line in plain text
fn is_section_heading(paragraph: &Paragraph) -> bool {
    if paragraph.is_markdown_heading() {
        return true;
    }
    let content = paragraph.content();
    !paragraph.is_bullet()
        && content.len() <= 40
        && content.chars().any(|c| c.is_alphabetic())
        && !content.chars().any(|c| c.is_lowercase())
}

fn section_end(paragraphs: &[Paragraph], heading: usize) -> usize {
    paragraphs
        .iter()
        .enumerate()
        .skip(heading + 1)
        .find(|(_, p)| is_section_heading(p))
        .map_or(paragraphs.len(), |(i, _)| i)
}

fn last_bullet_of_first_run(paragraphs: &[Paragraph], start: usize, end: usize) -> Option<usize> {
    let first = (start..end).find(|&i| paragraphs[i].is_bullet())?;
    let last = (first..end)
        .take_while(|&i| paragraphs[i].is_bullet())
        .last()
        .unwrap_or(first);
    Some(last)
}
