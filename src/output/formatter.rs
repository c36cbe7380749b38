//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::TailoringReport;
use crate::processing::mutator::InsertionOutcome;
use crate::processing::synthesizer::{Bullet, BulletSource};
use chrono::{DateTime, Local, Utc};
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting tailoring reports
pub trait OutputFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn source_label(source: &BulletSource) -> String {
    match source {
        BulletSource::Catalog { key } => format!("catalog: {}", key),
        BulletSource::PartialCatalog { key } => format!("partial catalog: {}", key),
        BulletSource::Generated { generator } => format!("generated: {}", generator),
        BulletSource::Fallback => "generic fallback".to_string(),
    }
}

fn insertion_line(outcome: &InsertionOutcome) -> String {
    match (&outcome.after_paragraph, &outcome.note) {
        _ if outcome.requested == 0 => "nothing to insert".to_string(),
        (Some(index), _) => format!(
            "{} of {} bullets inserted after paragraph {}",
            outcome.inserted,
            outcome.requested,
            index + 1
        ),
        (None, Some(note)) => format!("skipped ({})", note),
        (None, None) => "skipped".to_string(),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_source_tag(&self, bullet: &Bullet) -> String {
        let color = match bullet.source {
            BulletSource::Catalog { .. } => Color::Green,
            BulletSource::PartialCatalog { .. } => Color::BrightGreen,
            BulletSource::Generated { .. } => Color::Cyan,
            BulletSource::Fallback => Color::Yellow,
        };
        self.colorize(&format!("[{}]", source_label(&bullet.source)), color)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📝 RESUME TAILORING REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            DateTime::<Utc>::from(report.metadata.generated_at).format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!("Resume: {}\n", report.metadata.resume_path));
        output.push_str(&format!("Job description: {}\n", report.metadata.job_path));
        if let Some(path) = &report.metadata.output_path {
            output.push_str(&format!("Tailored resume: {}\n", self.colorize(path, Color::Cyan)));
        }

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&format!("🔍 Extracted: {}\n", report.extracted_skills.len()));
        output.push_str(&format!(
            "⚠️  Missing from resume: {}\n",
            self.colorize(&report.gaps.len().to_string(), Color::Yellow)
        ));
        if !report.dropped_gaps.is_empty() {
            output.push_str(&format!("   ({} more over the cap)\n", report.dropped_gaps.len()));
        }
        if self.detailed && !report.extracted_skills.is_empty() {
            output.push_str(&format!("   {}\n", report.extracted_skills.join(", ")));
        }
        for gap in &report.gaps {
            output.push_str(&format!("  • {}\n", gap));
        }
        if !report.degraded_rules.is_empty() {
            output.push_str(&format!(
                "{}\n",
                self.colorize(
                    &format!("Degraded extraction rules: {}", report.degraded_rules.join(", ")),
                    Color::Red
                )
            ));
        }

        if !report.bullets.is_empty() {
            output.push_str(&self.format_header("Bullets", 2));
            let counts = &report.source_counts;
            output.push_str(&format!(
                "📚 catalog: {} | partial: {} | generated: {} | fallback: {}\n\n",
                counts.catalog, counts.partial_catalog, counts.generated, counts.fallback
            ));
            for bullet in &report.bullets {
                output.push_str(&format!("{}\n", bullet.render()));
                if self.detailed {
                    output.push_str(&format!("    {} {}\n", bullet.skill, self.format_source_tag(bullet)));
                }
            }
        }

        if !report.fallbacks.is_empty() {
            output.push_str(&self.format_header("Generic Fallbacks", 3));
            for fallback in &report.fallbacks {
                output.push_str(&format!(
                    "  • {}: {}\n",
                    fallback.skill,
                    self.colorize(&fallback.reason.to_string(), Color::Yellow)
                ));
            }
        }

        if !report.requirements.is_empty() {
            output.push_str(&self.format_header("Requirement Categories", 2));
            for (category, tags) in report.requirements.non_empty() {
                output.push_str(&format!("  {}: {}\n", category.label(), tags.join(", ")));
            }
        }

        if let Some(mutation) = &report.mutation {
            output.push_str(&self.format_header("Document Changes", 2));
            output.push_str(&format!("✏️  Summary: {}\n", insertion_line(&mutation.summary)));
            output.push_str(&format!("✏️  Recent role: {}\n", insertion_line(&mutation.role)));
            if mutation.table_updates.is_empty() {
                output.push_str("📋 Skills table: no changes\n");
            }
            for update in &mutation.table_updates {
                output.push_str(&format!(
                    "📋 {}: + {}\n",
                    update.row,
                    self.colorize(&update.added.join(", "), Color::Green)
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let mut md = String::from("# Resume Tailoring Report\n\n");

        if self.include_metadata {
            md.push_str(&format!(
                "- **Generated:** {}\n- **Resume:** `{}`\n- **Job description:** `{}`\n",
                DateTime::<Utc>::from(report.metadata.generated_at).format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.resume_path,
                report.metadata.job_path
            ));
            if let Some(path) = &report.metadata.output_path {
                md.push_str(&format!("- **Tailored resume:** `{}`\n", path));
            }
            if let Some(generator) = &report.metadata.generator {
                md.push_str(&format!("- **Generator:** {}\n", generator));
            }
            md.push('\n');
        }

        md.push_str("## Missing Skills\n\n");
        if report.gaps.is_empty() {
            md.push_str("_None_\n\n");
        } else {
            for gap in &report.gaps {
                md.push_str(&format!("- {}\n", gap));
            }
            md.push('\n');
        }

        if !report.bullets.is_empty() {
            md.push_str("## Bullets\n\n| Skill | Sentence | Source |\n|---|---|---|\n");
            for bullet in &report.bullets {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    bullet.skill,
                    bullet.sentence.replace('|', "\\|"),
                    source_label(&bullet.source)
                ));
            }
            md.push('\n');
        }

        if !report.fallbacks.is_empty() {
            md.push_str("## Generic Fallbacks\n\n");
            for fallback in &report.fallbacks {
                md.push_str(&format!("- **{}**: {}\n", fallback.skill, fallback.reason));
            }
            md.push('\n');
        }

        if !report.requirements.is_empty() {
            md.push_str("## Requirement Categories\n\n");
            for (category, tags) in report.requirements.non_empty() {
                md.push_str(&format!("- **{}:** {}\n", category.label(), tags.join(", ")));
            }
            md.push('\n');
        }

        if let Some(mutation) = &report.mutation {
            md.push_str("## Document Changes\n\n");
            md.push_str(&format!("- Summary: {}\n", insertion_line(&mutation.summary)));
            md.push_str(&format!("- Recent role: {}\n", insertion_line(&mutation.role)));
            for update in &mutation.table_updates {
                md.push_str(&format!("- Skills table `{}`: added {}\n", update.row, update.added.join(", ")));
            }
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &TailoringReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name).file_stem().unwrap_or_default().to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", Local::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_tailoring{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_tailoring{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_tailoring{}.md", base_name, timestamp_suffix),
    }
}

/// `<stem>_Updated_<YYYYmmdd_HHMMSS>.<ext>` in `output_dir`
pub fn tailored_output_path(resume_path: &Path, output_dir: &Path, at: DateTime<Local>) -> PathBuf {
    let stem = resume_path.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = match resume_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_Updated_{}.{}", stem, at.format("%Y%m%d_%H%M%S"), ext),
        None => format!("{}_Updated_{}", stem, at.format("%Y%m%d_%H%M%S")),
    };
    output_dir.join(file_name)
}
