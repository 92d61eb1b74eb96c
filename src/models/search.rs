//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::Paper;
use crate::utils::ParseIssue;

/// Default number of results requested from the model
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Order in which results are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Highest relevance first, ties keep retrieved order
    #[default]
    Relevance,
    /// Order in which the model returned the papers
    Retrieved,
}

/// Search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Research question or topic
    pub query: String,

    /// Maximum number of results to ask for
    pub max_results: usize,

    /// Sort order for the results
    pub sort_by: SortBy,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortBy::default(),
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set sort order
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = sort;
        self
    }
}

/// Search response containing parsed papers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Papers in retrieved order
    pub papers: Vec<Paper>,

    /// Name of the source that produced the results
    pub source: String,

    /// Query that was searched
    pub query: String,

    /// Model that generated the results
    pub model: Option<String>,

    /// Fields the parser had to fill with placeholders
    #[serde(default)]
    pub issues: Vec<ParseIssue>,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(papers: Vec<Paper>, source: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            papers,
            source: source.into(),
            query: query.into(),
            model: None,
            issues: Vec::new(),
        }
    }

    /// Set the model that produced the response
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach parser issues
    pub fn issues(mut self, issues: Vec<ParseIssue>) -> Self {
        self.issues = issues;
        self
    }

    /// True when every paper was parsed without placeholders
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// Consume the response and return its papers in the requested order
    pub fn into_sorted(self, sort: SortBy) -> Vec<Paper> {
        sort_papers(self.papers, sort)
    }
}

/// Reorder papers for presentation.
///
/// `Retrieved` returns the input unchanged. `Relevance` is a stable sort by
/// non-increasing relevance.
pub fn sort_papers(mut papers: Vec<Paper>, sort: SortBy) -> Vec<Paper> {
    if sort == SortBy::Relevance {
        papers.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    }
    papers
}
