mod common;

use assert2::{check, let_assert};
use common::{GUIDE_INDEX, SCENARIO_INDEX, Served, TempWorkspace, served, workspace};
use docsearch::tools::reload::{ReloadRequest, handle_reload};
use docsearch::tools::search::{SearchRequest, handle_search};
use docsearch::tools::stats::handle_index_stats;
use docsearch::{IndexLoader, SearchConfig, SearchError};
use rstest::rstest;
use std::sync::Arc;

fn search(query: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        limit: None,
    }
}

fn reload(path: &std::path::Path) -> ReloadRequest {
    ReloadRequest {
        path: Some(path.display().to_string()),
    }
}

// --- Loading and the snapshot cache ---

#[rstest]
fn second_load_reuses_snapshot(workspace: TempWorkspace) {
    let path = workspace.path().join("search_index.js");
    let loader = workspace.loader();

    let cold = loader.load(&path).unwrap();
    check!(workspace.snapshot_count() == 1);

    let warm = loader.load(&path).unwrap();
    check!(workspace.snapshot_count() == 1);
    check!(warm.terms() == cold.terms());
    check!(warm.store().len() == 2);
}

#[rstest]
fn changed_source_gets_new_snapshot(workspace: TempWorkspace) {
    let loader = workspace.loader();
    loader.load(&workspace.path().join("search_index.js")).unwrap();
    loader.load(&workspace.create_file("guide.json", GUIDE_INDEX)).unwrap();
    check!(workspace.snapshot_count() == 2);
}

#[rstest]
fn loading_without_cache_writes_nothing(workspace: TempWorkspace) {
    let loader = IndexLoader::new(SearchConfig::default(), None);
    loader.load(&workspace.path().join("search_index.js")).unwrap();
    check!(workspace.snapshot_count() == 0);
}

#[rstest]
#[case::missing_field(r##"[{"location":"#a","page":"Home","title":"T","category":"page"}]"##)]
#[case::duplicate_location(r##"[{"location":"#a","page":"P","title":"T","text":"x","category":"page"},{"location":"#a","page":"P","title":"U","text":"y","category":"page"}]"##)]
#[case::unknown_category(r##"[{"location":"#a","page":"P","title":"T","text":"x","category":"type"}]"##)]
#[case::not_json("var documenterSearchIndex = {")]
fn malformed_files_fail_to_load(workspace: TempWorkspace, #[case] content: &str) {
    let path = workspace.create_file("bad.js", content);
    let_assert!(Err(SearchError::MalformedIndex { .. }) = workspace.loader().load(&path));
}

#[rstest]
fn missing_file_is_an_io_error(workspace: TempWorkspace) {
    let path = workspace.path().join("nope.js");
    let_assert!(Err(SearchError::Io { .. }) = workspace.loader().load(&path));
}

// --- Reloading a served index ---

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_swaps_in_new_corpus(#[future(awt)] served: Served) {
    let guide = served.workspace.create_file("guide.json", GUIDE_INDEX);

    let output = handle_reload(&served.state, reload(&guide)).await.unwrap();
    check!(output.contains("4 documents"));

    let output = handle_search(&served.state, search("velocity")).await.unwrap();
    check!(output.contains("(guide/#Queries)"));
    let output = handle_search(&served.state, search("storage")).await.unwrap();
    check!(!output.contains("(#b)"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_reload_keeps_previous_index(#[future(awt)] served: Served) {
    let bad = served.workspace.create_file("bad.js", "{\"docs\": 42}");

    let result = handle_reload(&served.state, reload(&bad)).await;
    let_assert!(Err(message) = result);
    check!(message.contains("malformed search index"));

    let output = handle_search(&served.state, search("storage")).await.unwrap();
    check!(output.contains("(#b)"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_reload_disables_search(#[future(awt)] served: Served) {
    let empty = served.workspace.create_file("empty.js", "[]");

    check!(handle_reload(&served.state, reload(&empty)).await.is_err());

    let_assert!(Err(message) = handle_search(&served.state, search("storage")).await);
    check!(message.contains("No search index is loaded"));

    let stats = handle_index_stats(&served.state).await.unwrap();
    check!(stats.starts_with("Search is unavailable"));

    // Restoring a good file brings search back
    let good = served.workspace.create_file("good.js", SCENARIO_INDEX);
    handle_reload(&served.state, reload(&good)).await.unwrap();
    check!(handle_search(&served.state, search("storage")).await.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_without_path_rereads_current_file(#[future(awt)] served: Served) {
    served
        .workspace
        .create_file("search_index.js", GUIDE_INDEX);

    let output = handle_reload(&served.state, ReloadRequest { path: None })
        .await
        .unwrap();
    check!(output.contains("4 documents"));
}

/// Test: after a failed reload, reloading without a path rereads the served file.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_without_path_after_failure_rereads_served_file(#[future(awt)] served: Served) {
    let bad = served.workspace.create_file("bad.json", "{");
    check!(handle_reload(&served.state, reload(&bad)).await.is_err());

    served
        .workspace
        .create_file("search_index.js", GUIDE_INDEX);
    let output = handle_reload(&served.state, ReloadRequest { path: None })
        .await
        .unwrap();
    check!(output.contains("search_index.js"));
    check!(output.contains("4 documents"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn index_stats_reports_active_index(#[future(awt)] served: Served) {
    let stats = handle_index_stats(&served.state).await.unwrap();
    check!(stats.contains("search_index.js"));
    check!(stats.contains("2 documents"));
}

/// Test: searches running during reloads always see a complete index.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn searches_during_reload_see_whole_index(#[future(awt)] served: Served) {
    let state = Arc::clone(&served.state);
    let guide = served.workspace.create_file("guide.json", GUIDE_INDEX);
    let scenario = served.workspace.path().join("search_index.js");

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                for _ in 0..20 {
                    let active = state.current().await.expect("index disappeared");
                    let documents = active.index.store().len();
                    check!((documents == 2 || documents == 4));
                    let hits = active.index.search("entity", 10).unwrap();
                    check!(!hits.is_empty());
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for i in 0..6 {
        let path = if i % 2 == 0 { &guide } else { &scenario };
        state.reload(Some(path.as_path())).await.unwrap();
    }

    for reader in readers {
        reader.await.unwrap();
    }
}
