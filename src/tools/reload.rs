//! Rebuilding the served index from a (new) index file.

use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReloadRequest {
    /// Path of the search index file. Omit to reload the current file.
    #[serde(default)]
    pub path: Option<String>,
}

/// Reload the index. On failure the previous index keeps serving (unless the new
/// file is empty, which disables search).
pub async fn handle_reload(
    state: &Arc<IndexState>,
    request: ReloadRequest,
) -> Result<String, String> {
    let path = request
        .path
        .as_deref()
        .map(|p| PathBuf::from(expand_tilde(p).as_ref()));

    let active = state
        .reload(path.as_deref())
        .await
        .map_err(|e| format!("Failed to reload index: {:#}", e))?;

    let stats = active.index.stats();
    Ok(format!(
        "Loaded {}\n• {} documents\n• {} unique terms\n• {} postings",
        active.source.display(),
        stats.documents,
        stats.terms,
        stats.postings
    ))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
