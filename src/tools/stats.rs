//! Size and provenance of the served index.

use crate::state::IndexState;
use std::sync::Arc;

pub async fn handle_index_stats(state: &Arc<IndexState>) -> Result<String, String> {
    let Some(active) = state.current().await else {
        return Ok(match state.source().await {
            Some(path) => format!("Search is unavailable (last load from {}).", path.display()),
            None => "No search index is loaded.".to_string(),
        });
    };

    let stats = active.index.stats();
    let age = active.loaded_at.elapsed().unwrap_or_default();
    Ok(format!(
        "Index: {}\n• {} documents\n• {} unique terms\n• {} postings\n• loaded {}s ago",
        active.source.display(),
        stats.documents,
        stats.terms,
        stats.postings,
        age.as_secs()
    ))
}
