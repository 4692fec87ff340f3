//! Tunable tokenizer, ranking and snippet options.
//!
//! Every option has a default so an empty (or absent) TOML file yields a working
//! configuration. Files only need to name the keys they override:
//!
//! ```toml
//! [ranking]
//! title_weight = 5.0
//!
//! [snippet]
//! context_chars = 40
//! ```

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Common English stop words dropped by the tokenizer unless overridden.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "to", "was", "will", "with",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub tokenizer: TokenizerConfig,
    pub ranking: RankingConfig,
    pub snippet: SnippetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizerConfig {
    /// Tokens with fewer characters than this are discarded.
    pub min_token_length: usize,
    /// Lower-case words that are never indexed nor searched.
    pub stop_words: Vec<String>,
    /// Also emit the parts of `CamelCase` identifiers as separate tokens.
    pub split_camel_case: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 2,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            split_camel_case: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Multiplier applied to term frequency in an entry's title.
    pub title_weight: f64,
    /// Multiplier applied to term frequency in an entry's text.
    pub text_weight: f64,
    /// Result count used when a caller does not pass one.
    pub default_limit: usize,
    /// Damping term added inside the idf logarithm: `ln(idf_smoothing + N / df)`.
    pub idf_smoothing: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            title_weight: 3.0,
            text_weight: 1.0,
            default_limit: 10,
            idf_smoothing: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnippetConfig {
    /// Characters kept on each side of the first matched token.
    pub context_chars: usize,
    /// Leading characters shown when no query token occurs in the text.
    pub fallback_chars: usize,
    /// Marker placed where the snippet cuts the text.
    pub ellipsis: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            context_chars: 80,
            fallback_chars: 160,
            ellipsis: "…".to_string(),
        }
    }
}

impl SearchConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml(source: &str) -> Result<Self, SearchError> {
        let config: Self =
            toml::from_str(source).map_err(|e| SearchError::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let source = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        tracing::debug!("Loaded search configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects option values that would make ranking or tokenization meaningless.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.tokenizer.min_token_length == 0 {
            return Err(SearchError::Config(
                "tokenizer.min_token_length must be at least 1".to_string(),
            ));
        }
        for (name, weight) in [
            ("ranking.title_weight", self.ranking.title_weight),
            ("ranking.text_weight", self.ranking.text_weight),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(SearchError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, weight
                )));
            }
        }
        if !self.ranking.idf_smoothing.is_finite() || self.ranking.idf_smoothing <= 0.0 {
            return Err(SearchError::Config(format!(
                "ranking.idf_smoothing must be a positive number, got {}",
                self.ranking.idf_smoothing
            )));
        }
        if self.ranking.default_limit == 0 {
            return Err(SearchError::Config(
                "ranking.default_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
