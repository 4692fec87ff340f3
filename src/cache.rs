//! On-disk snapshots of built inverted indices.
//!
//! A snapshot is keyed by an xxh3 fingerprint of the raw index bytes and the
//! tokenizer settings, so any change to either produces a different file name
//! and the old snapshot is simply never read again.

use crate::config::TokenizerConfig;
use crate::error::Result;
use crate::search::InvertedIndex;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::Xxh3;

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    fingerprint: u64,
    terms: InvertedIndex,
}

/// Directory of postcard-encoded index snapshots.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user cache directory, e.g. `~/.cache/docsearch` on Linux.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("docsearch"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Identifies an index build: same bytes and tokenizer settings, same fingerprint.
    pub fn fingerprint(source: &[u8], tokenizer: &TokenizerConfig) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(source);
        tokenizer.hash(&mut hasher);
        SNAPSHOT_VERSION.hash(&mut hasher);
        hasher.digest()
    }

    fn snapshot_path(&self, fingerprint: u64) -> PathBuf {
        self.dir.join(format!("{:016x}.index", fingerprint))
    }

    /// Loads the snapshot for `fingerprint`, discarding it if unreadable.
    pub fn load(&self, fingerprint: u64) -> Option<InvertedIndex> {
        let path = self.snapshot_path(fingerprint);
        let bytes = std::fs::read(&path).ok()?;

        match postcard::from_bytes::<Snapshot>(&bytes) {
            Ok(snapshot)
                if snapshot.version == SNAPSHOT_VERSION && snapshot.fingerprint == fingerprint =>
            {
                tracing::debug!("Using cached search index at {}", path.display());
                Some(snapshot.terms)
            }
            Ok(_) => {
                tracing::info!(
                    "Cached index at {} does not match, will rebuild",
                    path.display()
                );
                let _ = std::fs::remove_file(&path);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to deserialize cached index at {}: {}", path.display(), e);
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    /// Writes a snapshot unless one already exists for `fingerprint`.
    pub fn store(&self, fingerprint: u64, terms: &InvertedIndex) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;

        let path = self.snapshot_path(fingerprint);
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            fingerprint,
            terms: terms.clone(),
        };
        let bytes = postcard::to_stdvec(&snapshot).context("Failed to serialize search index")?;

        match std::fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
        {
            Ok(mut file) => {
                use std::io::Write as _;
                if let Err(e) = file.write_all(&bytes) {
                    let _ = std::fs::remove_file(&path);
                    return Err(e)
                        .with_context(|| format!("Failed to write search index to {}", path.display()));
                }
                tracing::debug!("Cached search index to {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Another process may have created it
                tracing::debug!("Index file already exists at {}", path.display());
                Ok(())
            }
            Err(e) => Err(e)
                .with_context(|| format!("Failed to create index file {}", path.display())),
        }
    }
}
