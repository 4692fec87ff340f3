use anyhow::Context;
use clap::Parser;
use docsearch::cli::{Cli, Commands};
use docsearch::tools::format_search_results;
use docsearch::{IndexCache, IndexLoader, IndexState, SearchConfig, SearchServer, logging};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    let cache = if cli.no_cache {
        None
    } else {
        cli.cache_dir
            .clone()
            .or_else(IndexCache::default_dir)
            .map(IndexCache::new)
    };
    match &cache {
        Some(cache) => tracing::debug!("Index snapshots cached in {}", cache.dir().display()),
        None => tracing::debug!("Index snapshot cache disabled"),
    }
    let loader = IndexLoader::new(config, cache);

    match cli.command {
        Commands::Serve { index } => serve(loader, index).await,
        Commands::Search {
            query,
            index,
            limit,
            json,
        } => {
            let index = loader
                .load(&index)
                .with_context(|| format!("Failed to load {}", index.display()))?;
            let limit = limit.unwrap_or(index.config().ranking.default_limit);
            let results = index.search(&query, limit)?;
            let display = index.format(&results);

            if json {
                println!("{}", serde_json::to_string_pretty(&display)?);
            } else if display.is_empty() {
                println!("No results found for '{}'.", query);
            } else {
                print!("{}", format_search_results(&results, &display));
            }
            Ok(())
        }
        Commands::Check { index: path } => {
            let index = loader
                .load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let stats = index.stats();
            println!(
                "{}: {} documents, {} unique terms, {} postings",
                path.display(),
                stats.documents,
                stats.terms,
                stats.postings
            );
            Ok(())
        }
    }
}

async fn serve(loader: IndexLoader, index: std::path::PathBuf) -> anyhow::Result<()> {
    tracing::info!("Starting docsearch MCP server");

    let state = Arc::new(IndexState::new(loader));
    // A bad index at start-up leaves search unavailable; reload_index can fix it later
    if let Err(e) = state.reload(Some(index.as_path())).await {
        tracing::error!("Starting without a search index: {:#}", e);
    }

    let server = SearchServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}
