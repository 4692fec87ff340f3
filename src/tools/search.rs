//! TF-IDF search handler for finding documentation entries.

use crate::search::{DisplayResult, SearchResults};
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::{fmt::Write as _, sync::Arc};

/// Number of "did you mean" alternatives offered for an empty result.
const SUGGESTION_COUNT: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text search query
    pub query: String,
    /// Maximum number of results to return (default from configuration, usually 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Execute a search against the active index.
pub async fn handle_search(
    state: &Arc<IndexState>,
    request: SearchRequest,
) -> Result<String, String> {
    let Some(active) = state.current().await else {
        return Err("No search index is loaded. \
                    Use reload_index with the path of a search index file."
            .to_string());
    };
    let index = &active.index;

    let limit = request
        .limit
        .unwrap_or(index.config().ranking.default_limit);
    let results = index.search(&request.query, limit).map_err(|e| e.to_string())?;

    if results.is_empty() {
        let mut msg = format!("No results found for '{}'.\n\n", request.query);

        let suggestions = index.suggest(&request.query, SUGGESTION_COUNT);
        if !suggestions.is_empty() {
            let _ = writeln!(msg, "Did you mean: {}\n", suggestions.join(", "));
        }

        msg.push_str("Search tips:\n");
        msg.push_str("• Matching is by whole word: 'entity' does not match 'entities'\n");
        msg.push_str("• Identifier parts are searchable: 'storage' finds 'ComponentStorage'\n");
        msg.push_str("• Common words like 'the' and 'of' are ignored\n");
        return Ok(msg);
    }

    let display = index.format(&results);
    Ok(format_search_results(&results, &display))
}

/// Format ranked results and their display records into readable text.
pub fn format_search_results(results: &SearchResults<'_>, display: &[DisplayResult]) -> String {
    let mut output = format!("Search results for '{}':\n\n", results.query.text);

    let max_score = results.hits.first().map_or(1.0, |hit| hit.score);

    for (idx, (hit, result)) in results.hits.iter().zip(display).enumerate() {
        let relevance = ((hit.score / max_score) * 100.0).round() as u8;
        let heading = if result.title.is_empty() || result.title == result.page {
            result.page.clone()
        } else {
            format!("{} › {}", result.page, result.title)
        };

        let _ = writeln!(
            output,
            "{}. {} [{}] ({}) - relevance: {}%",
            idx + 1,
            heading,
            hit.entry.category,
            result.location,
            relevance
        );
        if !result.snippet.is_empty() {
            let _ = writeln!(output, "   {}", result.snippet);
        }
        output.push('\n');
    }

    output
}
