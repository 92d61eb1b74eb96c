//! Output rendering for search results.
//!
//! Papers are rendered as Markdown (numbered list with linked titles), JSON
//! (array of objects), or CSV (header row plus one record per paper).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::Paper;

/// Heading written above Markdown output
pub const MARKDOWN_HEADING: &str = "# Research Results";

/// CSV column order
pub const CSV_HEADER: [&str; 4] = ["title", "link", "relevance", "abstract"];

/// Serialization format for rendered results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension
    ///
    /// `.json` and `.csv` select their formats (case-insensitive); any other
    /// extension, or none, falls back to Markdown.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => OutputFormat::Json,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Markdown,
        }
    }

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        write!(f, "{}", name)
    }
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8,
}

/// Render papers in the given format
pub fn render(papers: &[Paper], format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(papers)),
        OutputFormat::Json => render_json(papers),
        OutputFormat::Csv => render_csv(papers),
    }
}

/// Render papers as a numbered Markdown list under [`MARKDOWN_HEADING`]
pub fn render_markdown(papers: &[Paper]) -> String {
    let entries: Vec<String> = papers
        .iter()
        .enumerate()
        .map(|(idx, paper)| {
            format!(
                "{}. [{}]({})\n**Relevance:** {}/10\n**Abstract:** {}\n",
                idx + 1,
                escape_link_text(&paper.title),
                paper.link_or_anchor(),
                paper.relevance,
                paper.r#abstract
            )
        })
        .collect();

    format!("{}\n\n{}", MARKDOWN_HEADING, entries.join("\n"))
}

/// Backslash-escape brackets so a title cannot close the link text early
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Render papers as a pretty-printed JSON array
pub fn render_json(papers: &[Paper]) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(papers)?)
}

/// Render papers as CSV with a header row
///
/// The header is written even when there are no papers.
pub fn render_csv(papers: &[Paper]) -> Result<String, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for paper in papers {
        let relevance = paper.relevance.to_string();
        writer.write_record([
            paper.title.as_str(),
            paper.link.as_str(),
            relevance.as_str(),
            paper.r#abstract.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|_| RenderError::Utf8)
}

/// Render papers and write them to `path`
pub fn write_output(papers: &[Paper], path: &Path, format: OutputFormat) -> Result<(), RenderError> {
    let mut content = render(papers, format)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    std::fs::write(path, content)?;
    tracing::info!("Wrote {} papers as {} to {}", papers.len(), format, path.display());
    Ok(())
}
