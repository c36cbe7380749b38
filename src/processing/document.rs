//! Line-oriented structured document model for plain-text and Markdown resumes

use crate::input::FileType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
}

impl DocumentFormat {
    pub fn from_file_type(file_type: &FileType) -> Self {
        match file_type {
            FileType::Markdown => DocumentFormat::Markdown,
            _ => DocumentFormat::PlainText,
        }
    }
}

/// One line of prose, indentation included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Text without surrounding whitespace
    pub fn content(&self) -> &str {
        self.text.trim()
    }

    pub fn indent(&self) -> &str {
        let trimmed = self.text.trim_start();
        &self.text[..self.text.len() - trimmed.len()]
    }

    pub fn is_blank(&self) -> bool {
        self.content().is_empty()
    }

    /// Starts with a list marker or a numeric enumerator
    pub fn is_bullet(&self) -> bool {
        let content = self.content();
        if ["- ", "* ", "+ ", "\u{2022} "].iter().any(|m| content.starts_with(m)) {
            return true;
        }

        let digits = content.chars().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && (content[digits..].starts_with(". ") || content[digits..].starts_with(") "))
    }

    pub fn is_markdown_heading(&self) -> bool {
        self.content().starts_with('#')
    }

    /// Heading text with Markdown decoration removed, for name comparison
    pub fn heading_text(&self) -> String {
        self.content()
            .trim_start_matches('#')
            .trim()
            .trim_matches(|c| c == '*' || c == '_')
            .trim_end_matches(':')
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    separator: bool,
    /// Source line, dropped once a cell is edited
    raw: Option<String>,
}

impl TableRow {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        let cells: Vec<String> = inner.split('|').map(|c| c.trim().to_string()).collect();
        let separator = cells.iter().all(|c| {
            let c = c.trim_matches(':');
            !c.is_empty() && c.chars().all(|ch| ch == '-')
        });

        Self {
            cells,
            separator,
            raw: Some(line.to_string()),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.separator
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn set_cell(&mut self, index: usize, value: String) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
            self.raw = None;
        }
    }

    fn render(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => format!("| {} |", self.cells.join(" | ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// A resume as an ordered list of paragraphs and pipe tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    blocks: Vec<Block>,
    format: DocumentFormat,
    line_ending: String,
    trailing_newline: bool,
}

impl StructuredDocument {
    pub fn parse(text: &str, format: DocumentFormat) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let body = body.strip_suffix('\r').unwrap_or(body);

        let mut blocks: Vec<Block> = Vec::new();
        if !text.is_empty() {
            for line in body.split('\n') {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.trim_start().starts_with('|') {
                    let row = TableRow::parse(line);
                    match blocks.last_mut() {
                        Some(Block::Table(table)) => table.rows.push(row),
                        _ => blocks.push(Block::Table(Table { rows: vec![row] })),
                    }
                } else {
                    blocks.push(Block::Paragraph(Paragraph::new(line)));
                }
            }
        }

        Self {
            blocks,
            format,
            line_ending: line_ending.to_string(),
            trailing_newline,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Paragraphs only, in document order
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                Block::Table(_) => None,
            })
            .collect()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().len()
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Paragraph text joined by newlines; tables are left out
    pub fn paragraph_text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Insert `paragraphs` directly after paragraph `index` (counted over
    /// paragraphs only). An index past the end appends.
    pub fn insert_after_paragraph(&mut self, index: usize, paragraphs: Vec<Paragraph>) {
        let block_index = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(index)
            .map(|(i, _)| i + 1)
            .unwrap_or(self.blocks.len());

        let tail = self.blocks.split_off(block_index);
        self.blocks.extend(paragraphs.into_iter().map(Block::Paragraph));
        self.blocks.extend(tail);
    }

    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => lines.push(p.text.clone()),
                Block::Table(t) => lines.extend(t.rows.iter().map(TableRow::render)),
            }
        }

        let mut out = lines.join(&self.line_ending);
        if self.trailing_newline {
            out.push_str(&self.line_ending);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Jane Roe\n\n## Summary\n- Built things\n\n| Category | Skills |\n|---|---|\n| Databases | MySQL |\n\nTrailing line\n";

    #[test]
    fn test_render_round_trips_unmodified_input() {
        for text in [SAMPLE, "no trailing newline", "", "a\r\nb\r\n", "  indented\n\n\n"] {
            let doc = StructuredDocument::parse(text, DocumentFormat::Markdown);
            assert_eq!(doc.render(), text);
        }
    }

    #[test]
    fn test_tables_are_grouped_and_excluded_from_text() {
        let doc = StructuredDocument::parse(SAMPLE, DocumentFormat::Markdown);
        let tables: Vec<&Table> = doc.tables().collect();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 3);
        assert!(tables[0].rows[1].is_separator());
        assert_eq!(tables[0].rows[2].cell(1), Some("MySQL"));
        assert!(!doc.paragraph_text().contains("MySQL"));
        assert!(doc.paragraph_text().contains("- Built things"));
    }

    #[test]
    fn test_edited_row_is_rebuilt() {
        let mut doc = StructuredDocument::parse(SAMPLE, DocumentFormat::Markdown);
        for table in doc.tables_mut() {
            table.rows[2].set_cell(1, "MySQL, PostgreSQL".to_string());
        }

        assert!(doc.render().contains("| Databases | MySQL, PostgreSQL |\n"));
        assert!(doc.render().contains("|---|---|\n"));
    }

    #[test]
    fn test_insert_after_paragraph_counts_paragraphs_only() {
        let mut doc = StructuredDocument::parse(SAMPLE, DocumentFormat::Markdown);
        let count = doc.paragraph_count();

        // paragraph 5 is the blank line after the table
        doc.insert_after_paragraph(5, vec![Paragraph::new("- New")]);
        let rendered = doc.render();

        assert_eq!(doc.paragraph_count(), count + 1);
        assert!(rendered.contains("| Databases | MySQL |\n\n- New\nTrailing line\n"));
    }

    #[test]
    fn test_paragraph_helpers() {
        assert!(Paragraph::new("  - item").is_bullet());
        assert!(Paragraph::new("12) item").is_bullet());
        assert!(!Paragraph::new("2024 - present").is_bullet());
        assert_eq!(Paragraph::new("    - item").indent(), "    ");
        assert_eq!(Paragraph::new("## **Experience:**").heading_text(), "Experience");
    }
}
