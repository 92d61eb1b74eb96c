//! Mock model for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{GenerationRequest, GenerationResponse, LlmError, ModelClient};

/// A mock model that returns a predefined completion and records prompts.
#[derive(Debug, Default)]
pub struct MockModel {
    reply: Mutex<Option<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    /// Create a mock that answers with an empty completion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers with `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_response(text);
        mock
    }

    /// Set the completion text to return.
    pub fn set_response(&self, text: impl Into<String>) {
        let mut guard = self.reply.lock().unwrap();
        *guard = Some(Ok(text.into()));
    }

    /// Make every call fail with an API error carrying `message`.
    pub fn set_error(&self, message: impl Into<String>) {
        let mut guard = self.reply.lock().unwrap();
        *guard = Some(Err(message.into()));
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls made to the mock.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for MockModel {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let guard = self.reply.lock().unwrap();
        match &*guard {
            Some(Ok(text)) => Ok(GenerationResponse::new(text.clone())),
            Some(Err(message)) => Err(LlmError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(GenerationResponse::new(String::new())),
        }
    }
}
