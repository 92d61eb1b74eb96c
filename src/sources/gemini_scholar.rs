//! Google Scholar emulation backed by a generative model.
//!
//! Google Scholar has no public API. This source asks a hosted model to
//! answer as if it were a scholarly search engine and parses the list it
//! returns. Results are inferred by the model and may not reflect real
//! listings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::llm::{GenerationRequest, ModelClient};
use crate::models::{SearchQuery, SearchResponse};
use crate::sources::prompt::build_prompt;
use crate::sources::{Source, SourceError};
use crate::utils::{find_duplicates, parse_response};

/// Sampling temperature used unless configured otherwise
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Model-backed scholarly search
#[derive(Debug, Clone)]
pub struct GeminiScholarSource {
    model: Arc<dyn ModelClient>,
    temperature: f32,
}

impl GeminiScholarSource {
    /// Create a source that queries `model`
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Source for GeminiScholarSource {
    fn id(&self) -> &str {
        "gemini_scholar"
    }

    fn name(&self) -> &str {
        "Gemini (Google Scholar emulation)"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let prompt = build_prompt(&query.query, query.max_results)?;
        let query_text = query.query.trim();

        let request = GenerationRequest::new(prompt).temperature(self.temperature);
        let response = self.model.generate(&request).await?;

        let outcome = parse_response(&response.text)?;
        let mut papers = outcome.papers;
        let mut issues = outcome.issues;

        // Extra entries are dropped; missing ones are passed through
        if papers.len() > query.max_results {
            tracing::debug!(
                "Model returned {} papers, keeping the first {}",
                papers.len(),
                query.max_results
            );
            papers.truncate(query.max_results);
            issues.retain(|issue| issue.index < query.max_results);
        } else if papers.len() < query.max_results {
            tracing::warn!(
                "Model returned {} of {} requested papers",
                papers.len(),
                query.max_results
            );
        }

        for issue in &issues {
            tracing::warn!("Incomplete result, {}", issue);
        }

        for group in find_duplicates(&papers) {
            let positions: Vec<String> = group.iter().map(|i| (i + 1).to_string()).collect();
            tracing::warn!("Papers {} look like duplicates", positions.join(", "));
        }

        tracing::info!("Parsed {} papers from {}", papers.len(), self.model.model());

        Ok(SearchResponse::new(papers, self.name(), query_text)
            .model(self.model.model())
            .issues(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockModel;
    use crate::utils::ValidationError;

    const THREE_RESULTS: &str = "\
1. [First](https://example.org/1)
**Relevance:** 6/10
**Abstract:** One.

2. [Second](https://example.org/2)
**Relevance:** 9/10
**Abstract:** Two.

3. [Third](https://example.org/3)
**Relevance:** 8/10
";

    fn source_with(text: &str) -> (Arc<MockModel>, GeminiScholarSource) {
        let model = Arc::new(MockModel::with_response(text));
        let source = GeminiScholarSource::new(model.clone()).temperature(0.3);
        (model, source)
    }

    #[tokio::test]
    async fn test_search_parses_model_output() {
        let (model, source) = source_with(THREE_RESULTS);
        let response = source
            .search(&SearchQuery::new("graph neural networks").max_results(3))
            .await
            .unwrap();

        assert_eq!(response.papers.len(), 3);
        assert_eq!(response.papers[1].title, "Second");
        assert_eq!(response.model.as_deref(), Some("mock-model"));
        assert_eq!(response.query, "graph neural networks");
        // Third entry has no abstract
        assert_eq!(response.issues.len(), 1);
        assert_eq!(response.issues[0].index, 2);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("top 3 articles"));
    }

    #[tokio::test]
    async fn test_search_truncates_extra_results() {
        let (_, source) = source_with(THREE_RESULTS);
        let response = source
            .search(&SearchQuery::new("q").max_results(2))
            .await
            .unwrap();

        assert_eq!(response.papers.len(), 2);
        assert!(response.is_complete());
    }

    #[tokio::test]
    async fn test_search_passes_through_fewer_results() {
        let (_, source) = source_with(THREE_RESULTS);
        let response = source
            .search(&SearchQuery::new("q").max_results(10))
            .await
            .unwrap();
        assert_eq!(response.papers.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_query_never_calls_model() {
        let (model, source) = source_with(THREE_RESULTS);
        let err = source.search(&SearchQuery::new("   ")).await.unwrap_err();

        assert!(matches!(
            err,
            SourceError::InvalidRequest(ValidationError::EmptyQuery)
        ));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let (model, source) = source_with("");
        model.set_error("quota exceeded");
        let err = source.search(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SourceError::Model(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let (_, source) = source_with("Sorry, I cannot browse Google Scholar.");
        let err = source.search(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
