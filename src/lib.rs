//! # Queryosity
//!
//! Research search that emulates a scholarly search engine with a hosted
//! generative model and renders the results as Markdown, JSON, or CSV.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, SearchQuery, etc.)
//! - [`llm`]: Model client trait and the Gemini client
//! - [`sources`]: Prompt construction and the model-backed search source
//! - [`utils`]: Response parsing, rendering, validation, HTTP
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal status output
//!
//! A search runs as a straight pipeline: validate the query, build a prompt,
//! call the model once, parse its reply, sort, render.

pub mod config;
pub mod llm;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Paper, SearchQuery, SortBy};
pub use sources::{GeminiScholarSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
