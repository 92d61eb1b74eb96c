//! Lenient extraction of paper records from free-form model output.
//!
//! The prompt asks for a fixed Markdown shape, but the model does not always
//! follow it. Parsing is best-effort: an entry starts at a numbered line and
//! runs until the next one, and each field is looked up by its label inside
//! the entry. Fields that cannot be found are filled with placeholders and
//! reported as [`ParseIssue`]s instead of failing the whole response.
//!
//! ```text
//! 1. [Deep Residual Learning](https://arxiv.org/abs/1512.03385)
//! **Relevance:** 9/10
//! **Abstract:** Deeper neural networks are more difficult to train...
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use super::validate::validate_link;
use crate::models::{Paper, PaperBuilder, MAX_RELEVANCE};

/// Field of a [`Paper`] the parser looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperField {
    Title,
    Link,
    Relevance,
    Abstract,
}

impl PaperField {
    /// Returns the field name as used in rendered output
    pub fn name(&self) -> &'static str {
        match self {
            PaperField::Title => "title",
            PaperField::Link => "link",
            PaperField::Relevance => "relevance",
            PaperField::Abstract => "abstract",
        }
    }
}

impl std::fmt::Display for PaperField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What went wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Field was absent; a placeholder was used
    Missing,
    /// Link is not an absolute http(s) URL; kept verbatim
    InvalidLink,
    /// Relevance exceeded the scale and was clamped
    OutOfRange,
}

/// A field the parser could not extract cleanly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// Position of the paper in retrieved order (0-based)
    pub index: usize,
    pub field: PaperField,
    pub kind: IssueKind,
}

impl ParseIssue {
    fn new(index: usize, field: PaperField, kind: IssueKind) -> Self {
        Self { index, field, kind }
    }
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.index + 1;
        match self.kind {
            IssueKind::Missing => write!(f, "paper {}: missing {}", n, self.field),
            IssueKind::InvalidLink => {
                write!(f, "paper {}: link is not an absolute http(s) URL", n)
            }
            IssueKind::OutOfRange => write!(
                f,
                "paper {}: relevance above {} was clamped",
                n, MAX_RELEVANCE
            ),
        }
    }
}

/// Successful parse, possibly with partial records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Papers in retrieved order
    pub papers: Vec<Paper>,
    /// Fields that were filled with placeholders or adjusted
    pub issues: Vec<ParseIssue>,
}

impl ParseOutcome {
    /// True when every field of every paper was found
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues recorded for the paper at `index`
    pub fn issues_for(&self, index: usize) -> impl Iterator<Item = &ParseIssue> {
        self.issues.iter().filter(move |issue| issue.index == index)
    }
}

/// Hard parse failures: nothing usable in the response
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Model response is empty")]
    EmptyResponse,

    #[error("No paper entries found in model response")]
    NoEntries,
}

/// Labels recognised at the start of a line inside an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Title,
    Link,
    Relevance,
    Abstract,
    Other,
}

impl Label {
    fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        match name.as_str() {
            "title" => Label::Title,
            "link" | "url" => Label::Link,
            "abstract" | "summary" => Label::Abstract,
            n if n.starts_with("relevance") => Label::Relevance,
            _ => Label::Other,
        }
    }
}

fn entry_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:#{1,6}\s*)?(?:\*\*)?(\d{1,3})[.)](?:\*\*)?(?:\s+(.*))?$")
            .expect("entry pattern is valid")
    })
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:[-*+]\s+)?\**\s*(title|link|url|relevance(?:\s+score)?|abstract|summary|year|authors?|source)\s*\**\s*:\s*\**\s*(.*)$",
        )
        .expect("label pattern is valid")
    })
}

fn markdown_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Allows one level of brackets in the text and of parentheses in the URL
        Regex::new(r"\[((?:[^\[\]]|\[[^\]]*\])*)\]\(\s*<?((?:[^()\s<>]|\([^()\s]*\))*)>?\s*\)")
            .expect("link pattern is valid")
    })
}

fn bare_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://(?:[^\s<>()\[\]"']|\([^\s<>()"']*\))+"#).expect("url pattern is valid")
    })
}

fn format_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\[(?:pdf|html|book|citation|doc)\]\s*").expect("tag pattern is valid")
    })
}

fn score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,3})").expect("score pattern is valid"))
}

/// One numbered entry before field extraction
struct RawEntry<'a> {
    head: &'a str,
    body: Vec<&'a str>,
}

/// Parse a model response into papers.
///
/// Returns `Err` only when the response is empty or holds no numbered
/// entries at all. Anything else yields papers, with missing fields
/// recorded in [`ParseOutcome::issues`].
pub fn parse_response(text: &str) -> Result<ParseOutcome, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let entries = split_entries(text);
    if entries.is_empty() {
        return Err(ParseError::NoEntries);
    }

    let mut outcome = ParseOutcome::default();
    for (index, entry) in entries.iter().enumerate() {
        let paper = parse_entry(index, entry, &mut outcome.issues);
        outcome.papers.push(paper);
    }

    Ok(outcome)
}

fn split_entries(text: &str) -> Vec<RawEntry<'_>> {
    let mut entries: Vec<RawEntry<'_>> = Vec::new();

    for line in text.lines() {
        // Code fences around the list
        if line.trim_start().starts_with("```") {
            continue;
        }

        if let Some(caps) = entry_start_re().captures(line) {
            entries.push(RawEntry {
                head: caps.get(2).map_or("", |m| m.as_str()),
                body: Vec::new(),
            });
        } else if let Some(entry) = entries.last_mut() {
            entry.body.push(line);
        }
    }

    entries
}

fn parse_entry(index: usize, entry: &RawEntry<'_>, issues: &mut Vec<ParseIssue>) -> Paper {
    let (mut title, mut link) = title_and_link(entry.head);

    let mut relevance: Option<u32> = None;
    let mut abstract_lines: Vec<&str> = Vec::new();
    let mut loose: Vec<&str> = Vec::new();
    let mut current: Option<Label> = None;

    for line in &entry.body {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            current = None;
            continue;
        }

        let Some(caps) = label_re().captures(trimmed) else {
            if current == Some(Label::Abstract) {
                abstract_lines.push(trimmed);
            } else {
                loose.push(trimmed);
            }
            continue;
        };

        let label = Label::from_name(&caps[1]);
        let value = caps.get(2).map_or("", |m| m.as_str().trim());
        match label {
            Label::Title if title.is_empty() => {
                let (t, l) = title_and_link(value);
                title = t;
                if link.is_empty() {
                    link = l;
                }
            }
            Label::Link if link.is_empty() => link = extract_link(value),
            Label::Relevance if relevance.is_none() => relevance = parse_score(value),
            Label::Abstract if !value.is_empty() => abstract_lines.push(value),
            _ => {}
        }
        current = Some(label);
    }

    if link.is_empty() {
        link = std::iter::once(entry.head)
            .chain(loose.iter().copied())
            .find_map(find_bare_url)
            .unwrap_or_default();
    }

    // Unlabelled prose stands in for an abstract the model did not label
    if abstract_lines.is_empty() {
        abstract_lines = loose
            .iter()
            .copied()
            .filter(|line| !is_only_url(line))
            .collect();
    }
    let abstract_text = abstract_lines.join(" ");

    if title.is_empty() {
        issues.push(ParseIssue::new(index, PaperField::Title, IssueKind::Missing));
    }

    if link.is_empty() {
        issues.push(ParseIssue::new(index, PaperField::Link, IssueKind::Missing));
    } else if validate_link(&link).is_err() {
        issues.push(ParseIssue::new(index, PaperField::Link, IssueKind::InvalidLink));
    }

    let score = match relevance {
        Some(score) if score > u32::from(MAX_RELEVANCE) => {
            issues.push(ParseIssue::new(
                index,
                PaperField::Relevance,
                IssueKind::OutOfRange,
            ));
            MAX_RELEVANCE
        }
        Some(score) => u8::try_from(score).unwrap_or(MAX_RELEVANCE),
        None => {
            issues.push(ParseIssue::new(index, PaperField::Relevance, IssueKind::Missing));
            0
        }
    };

    if abstract_text.is_empty() {
        issues.push(ParseIssue::new(index, PaperField::Abstract, IssueKind::Missing));
    }

    PaperBuilder::new(title)
        .link(link)
        .relevance(score)
        .abstract_text(abstract_text)
        .build()
}

/// Extract title and link from an entry's first line
fn title_and_link(text: &str) -> (String, String) {
    let text = match label_re().captures(text) {
        Some(caps) if Label::from_name(&caps[1]) == Label::Title => {
            caps.get(2).map_or("", |m| m.as_str())
        }
        _ => text,
    };

    if let Some(caps) = markdown_link_re().captures(text) {
        return (clean_title(&caps[1]), normalize_link(&caps[2]));
    }

    match bare_url_re().find(text) {
        Some(m) if !text[..m.start()].trim().is_empty() => {
            (clean_title(&text[..m.start()]), trim_url(m.as_str()))
        }
        _ => (clean_title(text), String::new()),
    }
}

/// Strip Markdown emphasis and Scholar-style `[PDF]` tags from a title
fn clean_title(text: &str) -> String {
    let text = strip_emphasis(text);
    match format_tag_re().find(text) {
        Some(m) => strip_emphasis(&text[m.end()..]).to_string(),
        None => text.to_string(),
    }
}

fn strip_emphasis(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '#' | '"') || c.is_whitespace())
        .trim_end_matches(':')
        .trim()
}

fn normalize_link(link: &str) -> String {
    let link = link.trim();
    if link == "#" {
        String::new()
    } else {
        link.to_string()
    }
}

fn extract_link(value: &str) -> String {
    if let Some(caps) = markdown_link_re().captures(value) {
        return normalize_link(&caps[2]);
    }
    if let Some(url) = find_bare_url(value) {
        return url;
    }
    normalize_link(value.trim_matches(|c| c == '<' || c == '>'))
}

fn find_bare_url(text: &str) -> Option<String> {
    bare_url_re().find(text).map(|m| trim_url(m.as_str()))
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches(['.', ',', ';', ':']).to_string()
}

fn is_only_url(line: &str) -> bool {
    bare_url_re()
        .find(line)
        .is_some_and(|m| m.as_str().len() == line.trim().len())
}

fn parse_score(value: &str) -> Option<u32> {
    score_re()
        .captures(value)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}
