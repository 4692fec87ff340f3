//! Direct lookup of an entry by its location.

use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::{fmt::Write as _, sync::Arc};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    /// Location (URL fragment) of the entry, e.g. "#Entities.ComponentStorage"
    pub location: String,
}

/// Show the full entry stored at a location. A miss is reported, not treated as an error.
pub async fn handle_lookup(
    state: &Arc<IndexState>,
    request: LookupRequest,
) -> Result<String, String> {
    let active = state
        .current()
        .await
        .ok_or_else(|| "No search index is loaded.".to_string())?;

    let Some(entry) = active.index.store().get_by_location(&request.location) else {
        return Ok(format!("No entry found at location '{}'.", request.location));
    };

    let mut output = String::new();
    let _ = writeln!(output, "Location: {}", entry.location);
    let _ = writeln!(output, "Page: {}", entry.page);
    if !entry.title.is_empty() {
        let _ = writeln!(output, "Title: {}", entry.title);
    }
    let _ = writeln!(output, "Category: {}", entry.category);
    let text = entry.text.trim();
    if !text.is_empty() {
        let _ = write!(output, "\n{}\n", text);
    }
    Ok(output)
}
