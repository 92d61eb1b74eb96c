//! Prompt construction for scholarly-search emulation.

use crate::utils::{sanitize_query, validate_max_results, ValidationError};

/// Build the instruction sent to the model.
///
/// The query is trimmed and validated first; an empty query or a zero
/// result count is rejected before anything is sent.
pub fn build_prompt(query: &str, max_results: usize) -> Result<String, ValidationError> {
    let query = sanitize_query(query)?;
    let max_results = validate_max_results(max_results)?;

    Ok(format!(
        "Act as a scholarly search engine such as Google Scholar. Search for recent \
academic studies related to the following query:\n\
'{query}'.\n\
Provide the top {max_results} articles with this exact Markdown format:\n\
<number>. [<Title>](<URL>)\n\
**Relevance:** <score>/10\n\
**Abstract:** <text>\n\
Separate articles with a blank line. \
Rate relevance from 1-10 where 10 is the most relevant."
    ))
}
