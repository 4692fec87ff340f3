//! Reading an index file from disk into a ready-to-query [`SearchIndex`].

use crate::cache::IndexCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::search::SearchIndex;
use crate::store::DocumentStore;
use std::path::Path;

/// Loads index files with a fixed configuration, reusing cached snapshots when possible.
#[derive(Debug, Clone, Default)]
pub struct IndexLoader {
    config: SearchConfig,
    cache: Option<IndexCache>,
}

impl IndexLoader {
    pub fn new(config: SearchConfig, cache: Option<IndexCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Reads, validates and indexes the file at `path`.
    ///
    /// Cache failures are logged and never fail the load.
    pub fn load(&self, path: &Path) -> Result<SearchIndex, SearchError> {
        let start = std::time::Instant::now();
        let source = std::fs::read(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = std::str::from_utf8(&source).map_err(|e| SearchError::MalformedIndex {
            record: None,
            reason: format!("index is not valid UTF-8: {}", e),
        })?;
        let store = DocumentStore::from_json(text)?;
        if store.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let Some(cache) = &self.cache else {
            return SearchIndex::build(store, self.config.clone());
        };

        let fingerprint = IndexCache::fingerprint(&source, &self.config.tokenizer);
        if let Some(terms) = cache.load(fingerprint)
            && terms.document_count() == store.len()
        {
            tracing::debug!(
                "Loaded {} from cache in {:?}",
                path.display(),
                start.elapsed()
            );
            return SearchIndex::from_parts(store, terms, self.config.clone());
        }

        let index = SearchIndex::build(store, self.config.clone())?;
        if let Err(e) = cache.store(fingerprint, index.terms()) {
            tracing::warn!("Failed to cache search index for {}: {:#}", path.display(), e);
        }
        Ok(index)
    }
}
