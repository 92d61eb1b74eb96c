//! Integration tests for Queryosity
//!
//! These tests drive the full search pipeline: prompt, model call, parsing,
//! sorting and rendering.

use queryosity::config::GeminiConfig;
use queryosity::llm::{GeminiClient, MockModel};
use queryosity::models::{sort_papers, PaperBuilder, SearchQuery, SortBy};
use queryosity::sources::{GeminiScholarSource, Source, SourceError};
use queryosity::utils::{
    render, render_markdown, write_output, OutputFormat, PaperField, ValidationError,
};
use queryosity::Paper;
use std::sync::Arc;

const MODEL_REPLY: &str = "\
Here are the most relevant articles:

1. [Deep Residual Learning for Image Recognition](https://arxiv.org/abs/1512.03385)
**Relevance:** 7/10
**Abstract:** Residual connections ease the training of very deep networks.

2. [Attention Is All You Need](https://arxiv.org/abs/1706.03762)
**Relevance:** 10/10
**Abstract:** The Transformer relies entirely on attention, dispensing with recurrence.

3. [BERT: Pre-training of Deep Bidirectional Transformers](https://arxiv.org/abs/1810.04805)
**Relevance:** 9/10
**Abstract:** Bidirectional pre-training for language understanding, with commas, and \"quotes\".
";

fn mock_source(reply: &str) -> (Arc<MockModel>, GeminiScholarSource) {
    let model = Arc::new(MockModel::with_response(reply));
    (model.clone(), GeminiScholarSource::new(model))
}

#[tokio::test]
async fn test_search_pipeline_sorted_by_relevance() {
    let (model, source) = mock_source(MODEL_REPLY);
    let query = SearchQuery::new("transformer architectures").max_results(3);

    let response = source.search(&query).await.unwrap();
    assert!(response.is_complete());
    assert_eq!(model.call_count(), 1);

    let papers = response.into_sorted(SortBy::Relevance);
    let relevances: Vec<u8> = papers.iter().map(|p| p.relevance).collect();
    assert_eq!(relevances, vec![10, 9, 7]);
    assert_eq!(papers[0].title, "Attention Is All You Need");
}

#[tokio::test]
async fn test_search_pipeline_keeps_retrieved_order() {
    let (_, source) = mock_source(MODEL_REPLY);
    let query = SearchQuery::new("transformer architectures")
        .max_results(3)
        .sort_by(SortBy::Retrieved);

    let papers = source.search(&query).await.unwrap().into_sorted(query.sort_by);
    assert_eq!(papers[0].title, "Deep Residual Learning for Image Recognition");
    assert_eq!(papers[2].link, "https://arxiv.org/abs/1810.04805");
}

#[tokio::test]
async fn test_prompt_carries_query_and_count() {
    let (model, source) = mock_source(MODEL_REPLY);
    source
        .search(&SearchQuery::new("  soil microbiome  ").max_results(3))
        .await
        .unwrap();

    let prompt = &model.prompts()[0];
    assert!(prompt.contains("'soil microbiome'"));
    assert!(prompt.contains("top 3 articles"));
}

#[tokio::test]
async fn test_invalid_input_makes_no_model_call() {
    let (model, source) = mock_source(MODEL_REPLY);

    let err = source.search(&SearchQuery::new("")).await.unwrap_err();
    assert!(matches!(
        err,
        SourceError::InvalidRequest(ValidationError::EmptyQuery)
    ));

    let err = source
        .search(&SearchQuery::new("q").max_results(0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SourceError::InvalidRequest(ValidationError::InvalidResultCount(0))
    ));

    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_incomplete_entries_get_placeholders() {
    let reply = "\
1. [Only a title](https://example.org/1)

2. Untitled Study
**Relevance:** 4/10
**Abstract:** No link was given.
";
    let (_, source) = mock_source(reply);
    let response = source
        .search(&SearchQuery::new("q").max_results(2))
        .await
        .unwrap();

    assert!(!response.is_complete());
    let first = &response.papers[0];
    assert_eq!(first.relevance, 0);
    assert_eq!(first.r#abstract, "");

    let second = &response.papers[1];
    assert_eq!(second.title, "Untitled Study");
    assert_eq!(second.link, "");
    assert!(response
        .issues
        .iter()
        .any(|issue| issue.index == 1 && issue.field == PaperField::Link));

    let markdown = render_markdown(&response.papers);
    assert!(markdown.contains("2. [Untitled Study](#)"));
}

#[tokio::test]
async fn test_rendered_json_and_csv_outputs() {
    let (_, source) = mock_source(MODEL_REPLY);
    let papers = source
        .search(&SearchQuery::new("q").max_results(3))
        .await
        .unwrap()
        .into_sorted(SortBy::Relevance);

    let json = render(&papers, OutputFormat::Json).unwrap();
    let parsed: Vec<Paper> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, papers);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    write_output(&papers, &path, OutputFormat::from_path(&path)).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, vec!["title", "link", "relevance", "abstract"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][3], papers[1].r#abstract.as_str());
}

#[test]
fn test_markdown_output_shape() {
    let papers = sort_papers(
        vec![
            PaperBuilder::new("Low").link("https://example.org/low").relevance(2).build(),
            PaperBuilder::new("High").link("https://example.org/high").relevance(8).build(),
        ],
        SortBy::Relevance,
    );

    let markdown = render_markdown(&papers);
    assert_eq!(
        markdown,
        "# Research Results\n\n\
         1. [High](https://example.org/high)\n**Relevance:** 8/10\n**Abstract:** \n\n\
         2. [Low](https://example.org/low)\n**Relevance:** 2/10\n**Abstract:** \n"
    );
}

#[tokio::test]
async fn test_gemini_client_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            "/v1/projects/test-project/locations/us-central1/publishers/google/models/gemini-2.5-pro:generateContent",
        )
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": MODEL_REPLY}]},
                    "finishReason": "STOP"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = GeminiConfig {
        project_id: Some("test-project".to_string()),
        access_token: Some("test-token".to_string()),
        endpoint: Some(server.url()),
        ..GeminiConfig::default()
    };
    let client = GeminiClient::from_config(&config, None).unwrap();
    let source = GeminiScholarSource::new(Arc::new(client));

    let response = source
        .search(&SearchQuery::new("transformers").max_results(3))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.papers.len(), 3);
    assert_eq!(response.model.as_deref(), Some("gemini-2.5-pro"));
}

#[tokio::test]
async fn test_gemini_service_error_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", mockito::Matcher::Any)
        .with_status(429)
        .with_body("Resource exhausted")
        .create_async()
        .await;

    let config = GeminiConfig {
        project_id: Some("test-project".to_string()),
        access_token: Some("test-token".to_string()),
        endpoint: Some(server.url()),
        ..GeminiConfig::default()
    };
    let client = GeminiClient::from_config(&config, None).unwrap();
    let source = GeminiScholarSource::new(Arc::new(client));

    let err = source.search(&SearchQuery::new("q")).await.unwrap_err();
    assert!(matches!(err, SourceError::Model(_)));
    assert!(err.to_string().contains("429"));
}
