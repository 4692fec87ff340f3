//! The active search index of a running service and its atomic replacement.
//!
//! Handlers take a cheap `Arc` clone of the active index and search it without
//! holding any lock. A reload builds the replacement off the async runtime and
//! swaps the reference only once it is complete, so readers see either the old
//! index or the new one, never a partial build.

use crate::error::{Result, SearchError};
use crate::loader::IndexLoader;
use crate::search::SearchIndex;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{Mutex, RwLock};

/// A built index together with where it came from.
#[derive(Debug)]
pub struct ActiveIndex {
    pub index: SearchIndex,
    pub source: PathBuf,
    pub loaded_at: SystemTime,
}

/// Shared state for the service layer.
pub struct IndexState {
    /// Currently served index; `None` while search is unavailable
    active: RwLock<Option<Arc<ActiveIndex>>>,

    /// Last path that loaded successfully or turned out to be empty
    source: RwLock<Option<PathBuf>>,

    /// Serializes reloads so the last completed one wins
    reload_lock: Mutex<()>,

    loader: IndexLoader,
}

impl std::fmt::Debug for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexState")
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl IndexState {
    pub fn new(loader: IndexLoader) -> Self {
        Self {
            active: RwLock::new(None),
            source: RwLock::new(None),
            reload_lock: Mutex::new(()),
            loader,
        }
    }

    /// The index currently being served, if any.
    pub async fn current(&self) -> Option<Arc<ActiveIndex>> {
        self.active.read().await.clone()
    }

    /// Path `reload(None)` rereads: the last file that loaded or was found empty.
    pub async fn source(&self) -> Option<PathBuf> {
        self.source.read().await.clone()
    }

    /// Makes `index` the active index.
    pub async fn install(&self, index: SearchIndex, source: PathBuf) -> Arc<ActiveIndex> {
        let active = Arc::new(ActiveIndex {
            index,
            source,
            loaded_at: SystemTime::now(),
        });
        *self.active.write().await = Some(active.clone());
        active
    }

    /// Rebuilds from `path` (or the previous source) and swaps it in.
    ///
    /// - Malformed or unreadable input leaves the previous index and source active.
    /// - An empty corpus disables search until a later reload succeeds.
    pub async fn reload(&self, path: Option<&Path>) -> Result<Arc<ActiveIndex>> {
        let _guard = self.reload_lock.lock().await;

        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .source()
                .await
                .context("No index path given and no index loaded yet")?,
        };
        let loader = self.loader.clone();
        let build_path = path.clone();
        let start = std::time::Instant::now();
        let result = tokio::task::spawn_blocking(move || loader.load(&build_path))
            .await
            .context("Index build task panicked")?;

        match result {
            Ok(index) => {
                let documents = index.store().len();
                *self.source.write().await = Some(path.clone());
                let active = self.install(index, path).await;
                tracing::info!(
                    "Loaded search index from {} ({} documents) in {:?}",
                    active.source.display(),
                    documents,
                    start.elapsed()
                );
                Ok(active)
            }
            Err(SearchError::EmptyCorpus) => {
                *self.source.write().await = Some(path.clone());
                *self.active.write().await = None;
                tracing::warn!(
                    "Index at {} has no entries; search is unavailable",
                    path.display()
                );
                Err(SearchError::EmptyCorpus.into())
            }
            Err(e) if e.is_load_failure() => {
                tracing::error!(
                    "Failed to load index from {}: {}; keeping previous index",
                    path.display(),
                    e
                );
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(
                    "Index from {} rejected by the search configuration: {}; keeping previous index",
                    path.display(),
                    e
                );
                Err(e.into())
            }
        }
    }
}
