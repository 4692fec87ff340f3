//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docsearch application code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the CLI, server and cache layers.
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced by loading, building and querying a search index.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A record in the supplied index violates the input schema.
    ///
    /// `record` is the zero-based position of the offending record, when known.
    #[error("malformed search index{}: {reason}", fmt_record(.record))]
    MalformedIndex {
        record: Option<usize>,
        reason: String,
    },

    /// The index holds no entries; search should be disabled rather than fail hard.
    #[error("search index contains no entries")]
    EmptyCorpus,

    /// A caller-supplied argument was rejected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration file could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub(crate) fn malformed(record: usize, reason: impl Into<String>) -> Self {
        Self::MalformedIndex {
            record: Some(record),
            reason: reason.into(),
        }
    }

    /// True for errors that leave the process able to serve from a previous index.
    pub const fn is_load_failure(&self) -> bool {
        matches!(self, Self::MalformedIndex { .. } | Self::Io { .. })
    }
}

fn fmt_record(record: &Option<usize>) -> String {
    record.map(|r| format!(" (record {})", r)).unwrap_or_default()
}
