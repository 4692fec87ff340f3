//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Each test writes its index files into a fresh temporary directory and gets its
//! own snapshot cache directory inside it, so no test observes another's cached
//! snapshots.
//!
//! # Available Fixtures
//!
//! - `workspace`: An isolated workspace holding the two-entry scenario corpus
//! - `served`: The same workspace with an `IndexState` already serving it

use docsearch::{IndexCache, IndexLoader, IndexState, SearchConfig};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// The two-entry corpus in the JS wrapper format documentation generators emit.
pub const SCENARIO_INDEX: &str = r##"var documenterSearchIndex = {"docs":
[{"location":"#a","page":"Home","title":"Entities","text":"Documentation for Entities.","category":"page"},{"location":"#b","page":"Home","title":"ComponentStorage","text":"Contiguous storage of components keyed by entity.","category":"section"}]
}
"##;

/// A larger corpus for ranking and snippet tests.
pub const GUIDE_INDEX: &str = r#"[
{"location":"guide/#Systems","page":"Guide","title":"Systems","text":"A system iterates over every entity that has the requested components. Systems run in the order they were registered with the world.","category":"page"},
{"location":"guide/#Queries","page":"Guide","title":"Queries","text":"Queries select entities by component. A query over Position and Velocity visits each matching entity once.","category":"section"},
{"location":"api/#World","page":"API","title":"World","text":"The world owns all entities, components and systems.","category":"section"},
{"location":"api/#ComponentStorage","page":"API","title":"ComponentStorage","text":"Dense storage for a single component type.","category":"section"}
]"#;

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Loader with default configuration caching snapshots inside this workspace.
    pub fn loader(&self) -> IndexLoader {
        IndexLoader::new(
            SearchConfig::default(),
            Some(IndexCache::new(self.root.join("cache"))),
        )
    }

    /// Number of snapshot files written to this workspace's cache.
    pub fn snapshot_count(&self) -> usize {
        std::fs::read_dir(self.root.join("cache"))
            .map(|entries| entries.filter_map(Result::ok).count())
            .unwrap_or(0)
    }
}

/// Isolated workspace holding `search_index.js` (the scenario corpus).
#[fixture]
pub fn workspace() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.create_file("search_index.js", SCENARIO_INDEX);
    workspace
}

/// Workspace plus a state already serving its scenario corpus.
#[allow(dead_code)]
pub struct Served {
    pub workspace: TempWorkspace,
    pub state: Arc<IndexState>,
}

#[fixture]
pub async fn served(workspace: TempWorkspace) -> Served {
    let state = Arc::new(IndexState::new(workspace.loader()));
    state
        .reload(Some(workspace.path().join("search_index.js").as_path()))
        .await
        .expect("Failed to load scenario corpus");
    Served { workspace, state }
}
