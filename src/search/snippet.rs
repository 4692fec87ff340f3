//! Display records and text snippets for ranked hits.

use crate::config::SnippetConfig;
use ahash::AHashSet;
use serde::Serialize;

use super::query::SearchResults;
use super::tokenize::{Tokenizer, word_spans};

/// A hit ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
    pub location: String,
    pub page: String,
    pub title: String,
    pub snippet: String,
}

/// Maps ranked hits to display records, preserving order.
pub fn format_results(
    results: &SearchResults<'_>,
    tokenizer: &Tokenizer,
    config: &SnippetConfig,
) -> Vec<DisplayResult> {
    let query_tokens: AHashSet<&str> = results.query.tokens.iter().map(String::as_str).collect();

    results
        .hits
        .iter()
        .map(|hit| DisplayResult {
            location: hit.entry.location.clone(),
            page: hit.entry.page.clone(),
            title: hit.entry.title.clone(),
            snippet: snippet(&hit.entry.text, &query_tokens, tokenizer, config),
        })
        .collect()
}

/// Excerpt of `text` centred on the first word producing one of `query_tokens`.
///
/// Keeps `context_chars` characters on each side of that word. When no word
/// matches, the first `fallback_chars` characters are used instead. Whitespace
/// runs are collapsed and the ellipsis marks each side where text was cut.
pub fn snippet(
    text: &str,
    query_tokens: &AHashSet<&str>,
    tokenizer: &Tokenizer,
    config: &SnippetConfig,
) -> String {
    let mut word_tokens = vec![];
    let matched = word_spans(text).find(|span| {
        word_tokens.clear();
        tokenizer.tokenize_word(&text[span.clone()], &mut word_tokens);
        word_tokens.iter().any(|t| query_tokens.contains(t.as_str()))
    });

    let (start, end) = match matched {
        Some(span) => (
            chars_before(text, span.start, config.context_chars),
            chars_after(text, span.end, config.context_chars),
        ),
        None => (0, chars_after(text, 0, config.fallback_chars)),
    };

    let body = collapse_whitespace(&text[start..end]);
    if body.is_empty() {
        return body;
    }

    let mut out = String::with_capacity(body.len() + 2 * config.ellipsis.len());
    if !text[..start].trim().is_empty() {
        out.push_str(&config.ellipsis);
    }
    out.push_str(&body);
    if !text[end..].trim().is_empty() {
        out.push_str(&config.ellipsis);
    }
    out
}

/// Byte offset `n` characters before `from`, clamped to the start of `text`.
fn chars_before(text: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte offset `n` characters after `from`, clamped to the end of `text`.
fn chars_after(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
