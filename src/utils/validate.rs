//! Input validation for queries, result counts, and paper links.
//!
//! Queries are checked before a prompt is built, so invalid input never
//! reaches the model service.

use thiserror::Error;

/// Upper bound on the number of results a single prompt may ask for.
pub const MAX_RESULTS_LIMIT: usize = 50;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid result count {0}: must be between 1 and {max}", max = MAX_RESULTS_LIMIT)]
    InvalidResultCount(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate a query string and return it trimmed
///
/// Rejects empty or whitespace-only input and control characters other
/// than tab, newline, and carriage return.
pub fn sanitize_query(query: &str) -> Result<String, ValidationError> {
    let query = query.trim();

    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    if query.contains('\0') {
        return Err(ValidationError::InvalidQuery("contains null byte".to_string()));
    }

    for ch in query.chars() {
        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            return Err(ValidationError::InvalidQuery(
                "contains control characters".to_string(),
            ));
        }
    }

    Ok(query.to_string())
}

/// Validate the requested number of results
pub fn validate_max_results(max_results: usize) -> Result<usize, ValidationError> {
    if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
        return Err(ValidationError::InvalidResultCount(max_results));
    }
    Ok(max_results)
}

/// Validate a paper link returned by the model
///
/// Only absolute `http` and `https` URLs are accepted.
pub fn validate_link(link: &str) -> Result<String, ValidationError> {
    let link = link.trim();

    if link.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(link).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(link.to_string()),
        scheme => Err(ValidationError::InvalidUrl(format!(
            "invalid scheme: {}",
            scheme
        ))),
    }
}
