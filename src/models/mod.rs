//! Core data models for papers and search operations.

mod paper;
mod search;

pub use paper::{Paper, PaperBuilder, MAX_RELEVANCE};
pub use search::{sort_papers, SearchQuery, SearchResponse, SortBy, DEFAULT_MAX_RESULTS};
