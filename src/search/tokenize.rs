//! Text normalization shared by indexing and querying.

use crate::config::TokenizerConfig;
use ahash::AHashSet;
use std::ops::Range;

/// Splits text into lower-cased, filtered tokens.
///
/// Words are maximal runs of alphanumeric characters. When camel-case splitting
/// is enabled, a word with lower→upper transitions also yields its parts:
/// - **CamelCase**: "ComponentStorage" → ["component", "storage", "componentstorage"]
/// - **dotted paths**: "Entities.ComponentStorage" → ["entities", "component", "storage", "componentstorage"]
/// - **snake_case**: "parse_json" → ["parse", "json"] (the underscore is a word boundary)
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_token_length: usize,
    stop_words: AHashSet<String>,
    split_camel_case: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: &TokenizerConfig) -> Self {
        Self {
            min_token_length: config.min_token_length,
            stop_words: config
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            split_camel_case: config.split_camel_case,
        }
    }

    /// Tokenizes `text`. Never fails; empty or punctuation-only input gives no tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = vec![];
        for span in word_spans(text) {
            self.tokenize_word(&text[span], &mut tokens);
        }
        tokens
    }

    /// Pushes the tokens of a single alphanumeric word.
    pub(crate) fn tokenize_word(&self, word: &str, tokens: &mut Vec<String>) {
        if self.split_camel_case {
            let parts = camel_parts(word);
            if parts.len() > 1 {
                for part in parts {
                    self.push_token(&word[part], tokens);
                }
            }
        }
        self.push_token(word, tokens);
    }

    /// Lower-cases a token and keeps it unless it is too short or a stop word.
    ///
    /// Case folding can introduce combining marks ("İ" lowers to "i" + U+0307),
    /// so anything non-alphanumeric is dropped again before the length check.
    fn push_token(&self, token: &str, tokens: &mut Vec<String>) {
        let lowercase: String = token
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if lowercase.chars().count() < self.min_token_length {
            return;
        }
        if self.stop_words.contains(&lowercase) {
            return;
        }
        tokens.push(lowercase);
    }
}

/// Byte ranges of the maximal alphanumeric runs in `text`.
pub(crate) fn word_spans(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        // Skip separators
        let (start, _) = loop {
            let (i, c) = chars.next()?;
            if c.is_alphanumeric() {
                break (i, c);
            }
        };
        let mut end = text.len();
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_alphanumeric() {
                end = i;
                break;
            }
            chars.next();
        }
        Some(start..end)
    })
}

/// Byte ranges of the camel-case components of a single word.
///
/// A new component starts at each lowercase → uppercase transition, so
/// acronyms such as "HTTPServer" stay whole.
fn camel_parts(word: &str) -> Vec<Range<usize>> {
    let mut parts = vec![];
    let mut part_start = 0;
    let mut last_lower = false;

    for (i, c) in word.char_indices() {
        if last_lower && c.is_uppercase() {
            parts.push(part_start..i);
            part_start = i;
        }
        last_lower = c.is_lowercase();
    }
    parts.push(part_start..word.len());
    parts
}
