//! Full-text search over the search indices emitted by documentation-site generators.
//!
//! The index file is loaded into an immutable [`DocumentStore`], tokenized into an
//! [`InvertedIndex`], and queried through a [`SearchIndex`]:
//!
//! ```no_run
//! use docsearch::{DocumentStore, SearchConfig, SearchIndex};
//!
//! # fn main() -> Result<(), docsearch::SearchError> {
//! let store = DocumentStore::from_path("build/search_index.js".as_ref())?;
//! let index = SearchIndex::build(store, SearchConfig::default())?;
//! for result in index.query("component storage", Some(5))? {
//!     println!("{} {}: {}", result.location, result.title, result.snippet);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod search;
pub mod server;
pub mod state;
pub mod store;
pub mod tools;

pub use cache::IndexCache;
pub use config::{RankingConfig, SearchConfig, SnippetConfig, TokenizerConfig};
pub use error::SearchError;
pub use loader::IndexLoader;
pub use search::{DisplayResult, InvertedIndex, ScoredResult, SearchIndex, SearchResults, Tokenizer};
pub use server::SearchServer;
pub use state::{ActiveIndex, IndexState};
pub use store::{Category, DocId, DocumentEntry, DocumentStore, RawEntry};
