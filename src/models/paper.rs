//! Paper model representing a single search result returned by the model.

use serde::{Deserialize, Serialize};

/// Highest relevance score a paper can carry.
pub const MAX_RELEVANCE: u8 = 10;

/// A research paper extracted from a model response
///
/// Records are created once by the response parser and never mutated
/// afterwards. Their position in the returned list is the retrieved order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Paper title
    pub title: String,

    /// Paper page URL (empty when the model did not give one)
    pub link: String,

    /// Relevance score assigned by the model, 0-10
    pub relevance: u8,

    /// Abstract text
    pub r#abstract: String,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(title: impl Into<String>, link: impl Into<String>, relevance: u8) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            relevance: relevance.min(MAX_RELEVANCE),
            r#abstract: String::new(),
        }
    }

    /// Link suitable for a Markdown anchor, `#` when the paper has none
    pub fn link_or_anchor(&self) -> &str {
        if self.link.is_empty() {
            "#"
        } else {
            &self.link
        }
    }

    /// Check if the paper has a link
    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(title, String::new(), 0),
        }
    }

    /// Set link
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.paper.link = link.into();
        self
    }

    /// Set relevance, clamped to [`MAX_RELEVANCE`]
    pub fn relevance(mut self, relevance: u8) -> Self {
        self.paper.relevance = relevance.min(MAX_RELEVANCE);
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("Attention Is All You Need")
            .link("https://arxiv.org/abs/1706.03762")
            .relevance(9)
            .abstract_text("The dominant sequence transduction models...")
            .build();

        assert_eq!(paper.title, "Attention Is All You Need");
        assert_eq!(paper.link, "https://arxiv.org/abs/1706.03762");
        assert_eq!(paper.relevance, 9);
        assert!(paper.r#abstract.starts_with("The dominant"));
    }

    #[test]
    fn test_relevance_is_clamped() {
        assert_eq!(PaperBuilder::new("x").relevance(42).build().relevance, 10);
        assert_eq!(Paper::new("x", "", 11).relevance, 10);
    }

    #[test]
    fn test_link_or_anchor() {
        let without = Paper::new("Test", "", 3);
        assert_eq!(without.link_or_anchor(), "#");
        assert!(!without.has_link());

        let with = Paper::new("Test", "https://example.com", 3);
        assert_eq!(with.link_or_anchor(), "https://example.com");
    }

    #[test]
    fn test_serializes_abstract_without_raw_prefix() {
        let paper = PaperBuilder::new("T").abstract_text("A").build();
        let json = serde_json::to_value(&paper).unwrap();
        assert_eq!(json["abstract"], "A");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
