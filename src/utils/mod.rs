//! Utility modules supporting the search pipeline.
//!
//! - [`parse_response`]: Lenient extraction of papers from model output
//! - [`render`]: Markdown, JSON, and CSV rendering
//! - [`find_duplicates`]: Detect repeated papers in a response
//! - [`HttpClient`]: Shared HTTP client with timeouts
//! - [`sanitize_query`]: Validate user input before it reaches the model
//!
//! # Parsing and rendering
//!
//! ```rust
//! use queryosity::utils::{parse_response, render, OutputFormat};
//!
//! let text = "1. [A Study](https://example.org/a)\n**Relevance:** 8/10\n**Abstract:** Findings.\n";
//! let outcome = parse_response(text).unwrap();
//! assert!(outcome.is_complete());
//!
//! let csv = render(&outcome.papers, OutputFormat::Csv).unwrap();
//! assert!(csv.starts_with("title,link,relevance,abstract"));
//! ```

mod dedup;
mod http;
mod parse;
mod render;
mod validate;

pub use dedup::find_duplicates;
pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use parse::{parse_response, IssueKind, PaperField, ParseError, ParseIssue, ParseOutcome};
pub use render::{
    render, render_csv, render_json, render_markdown, write_output, OutputFormat, RenderError,
    CSV_HEADER, MARKDOWN_HEADING,
};
pub use validate::{
    sanitize_query, validate_link, validate_max_results, ValidationError, MAX_RESULTS_LIMIT,
};
