//! Gemini on Vertex AI.
//!
//! Calls the `generateContent` REST method:
//!
//! ```text
//! POST https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent
//! ```
//!
//! Authentication uses an OAuth access token. When none is configured the
//! token is obtained from `gcloud auth print-access-token`, which reads the
//! same Application Default Credentials the Google SDKs use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationRequest, GenerationResponse, LlmError, ModelClient, TokenUsage};
use crate::config::GeminiConfig;
use crate::utils::HttpClient;

/// Default Vertex AI region
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Longest error body excerpt carried into [`LlmError::Api`]
const MAX_ERROR_BODY: usize = 500;

/// Where the bearer token comes from
#[derive(Debug, Clone)]
enum Credentials {
    Token(String),
    Gcloud,
}

/// Gemini model client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: HttpClient,
    url: String,
    model: String,
    credentials: Credentials,
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// `timeout` overrides `config.timeout_secs` when given.
    pub fn from_config(config: &GeminiConfig, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let project_id = config
            .project_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| LlmError::Config("Gemini project id is not set".to_string()))?;

        let timeout = timeout.unwrap_or(Duration::from_secs(config.timeout_secs));
        let client = HttpClient::with_timeout(timeout)
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base = config.endpoint.clone().unwrap_or_else(|| {
            format!("https://{}-aiplatform.googleapis.com", config.location)
        });

        let credentials = match &config.access_token {
            Some(token) if !token.trim().is_empty() => Credentials::Token(token.trim().to_string()),
            _ => Credentials::Gcloud,
        };

        Ok(Self {
            client,
            url: generate_content_url(&base, project_id, &config.location, &config.model),
            model: config.model.clone(),
            credentials,
        })
    }

    /// Full `generateContent` URL this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn access_token(&self) -> Result<String, LlmError> {
        match &self.credentials {
            Credentials::Token(token) => Ok(token.clone()),
            Credentials::Gcloud => gcloud_access_token().await,
        }
    }
}

fn generate_content_url(base: &str, project: &str, location: &str, model: &str) -> String {
    format!(
        "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        base.trim_end_matches('/'),
        project,
        location,
        model
    )
}

async fn gcloud_access_token() -> Result<String, LlmError> {
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| {
            LlmError::Auth(format!(
                "could not run gcloud ({}); set GOOGLE_ACCESS_TOKEN instead",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LlmError::Auth(format!(
            "gcloud auth print-access-token failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(LlmError::Auth("gcloud returned an empty access token".to_string()));
    }
    Ok(token)
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let token = self.access_token().await?;
        let body = GenerateContentRequest::from(request);

        tracing::debug!(url = %self.url, prompt_chars = request.prompt.len(), "Calling Gemini");

        let response = self
            .client
            .client()
            .post(&self.url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(format!("Failed to reach Gemini: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message: String = text.trim().chars().take(MAX_ERROR_BODY).collect();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse Gemini response: {}", e)))?;

        data.into_generation_response()
    }
}

// ========== WIRE TYPES ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GenerateContentResponse {
    fn into_generation_response(self) -> Result<GenerationResponse, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let usage = self.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        if let Some(usage) = &usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Gemini usage"
            );
        }

        Ok(GenerationResponse {
            text,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }
}
