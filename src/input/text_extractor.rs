//! Text extraction from various file formats

use crate::error::{Result, TailorError};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            TailorError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Flatten Markdown to plain lines; list items keep a "- " marker so
/// list-line extraction still sees them
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_to_text(&html_output)
}

fn html_to_text(html: &str) -> String {
    let text = html
        .replace("<li>\n<p>", "\n- ")
        .replace("<li>", "\n- ")
        .replace("<br>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</h1>", "\n")
        .replace("</h2>", "\n")
        .replace("</h3>", "\n")
        .replace("</td>", " | ")
        .replace("</tr>", "\n");

    let clean_text = HTML_TAG.replace_all(&text, "");
    let clean_text = clean_text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<String> = clean_text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && line != "-")
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_list_items_keep_markers() {
        let text = markdown_to_text("## Requirements\n\n* Kubernetes\n* Terraform &amp; Helm\n\nNice to have: Go.");
        assert_eq!(text, "Requirements\n- Kubernetes\n- Terraform & Helm\nNice to have: Go.");
    }

    #[test]
    fn test_nested_paragraph_list_items() {
        let text = markdown_to_text("1. First item\n\n2. Second item\n");
        assert!(text.contains("- First item"));
        assert!(text.contains("- Second item"));
    }
}
