//! Research sources.
//!
//! This module defines the [`Source`] trait that a search backend implements.
//! The only backend is [`GeminiScholarSource`], which emulates a scholarly
//! search with a hosted generative model.

mod gemini_scholar;
pub mod prompt;

pub use gemini_scholar::{GeminiScholarSource, DEFAULT_TEMPERATURE};
pub use prompt::build_prompt;

use crate::llm::LlmError;
use crate::models::{SearchQuery, SearchResponse};
use crate::utils::{ParseError, ValidationError};
use async_trait::async_trait;

/// The Source trait defines the interface for search backends.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for papers matching the query
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;
}

/// Errors that can occur when searching a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// The model service call failed
    #[error("Model error: {0}")]
    Model(#[from] LlmError),

    /// The model response held no usable results
    #[error("Unparseable response: {0}")]
    Parse(#[from] ParseError),
}
