//! Full-text search over a documentation index.
//!
//! This module provides TF-IDF search with title weighting: tokenization,
//! inverted index construction, scoring, query evaluation and snippet formatting.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod snippet;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{Field, IndexStats, InvertedIndex, Posting, SearchIndex};
pub use query::{Query, ScoredResult, SearchResults, evaluate};
pub use scoring::{FieldWeights, idf, rank_order};
pub use snippet::{DisplayResult, format_results, snippet};
pub use tokenize::Tokenizer;
