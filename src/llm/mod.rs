//! Hosted generative model clients.
//!
//! The search pipeline only needs one operation from a model: send a prompt,
//! get text back. [`ModelClient`] captures that seam so the Gemini client
//! can be swapped for [`MockModel`] in tests.

mod gemini;
mod mock;

pub use gemini::{GeminiClient, DEFAULT_LOCATION, DEFAULT_MODEL};
pub use mock::MockModel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single prompt sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a request for a prompt with model defaults
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Token accounting reported by the model service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text completion returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Completion text
    pub text: String,

    /// Why the model stopped, as reported by the service
    pub finish_reason: Option<String>,

    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    /// Create a response holding only text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage: None,
        }
    }
}

/// Client for a hosted text generation model
#[async_trait]
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    /// Model identifier (e.g. "gemini-2.5-pro")
    fn model(&self) -> &str;

    /// Send a prompt and return the completion
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError>;
}

/// Errors that can occur when calling a model service
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Could not obtain or use credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from the service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service refused to answer the prompt
    #[error("Prompt blocked by model service: {0}")]
    Blocked(String),

    /// The service answered without any text
    #[error("Model returned no text")]
    EmptyResponse,

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Parse(format!("JSON: {}", err))
    }
}
