use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docsearch", version)]
#[command(about = "Full-text search over generated documentation-site indices", long_about = None)]
pub struct Cli {
    /// TOML file with tokenizer, ranking and snippet settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for cached index snapshots (default: the user cache directory)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Always rebuild the index instead of using cached snapshots
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the index over MCP on stdio
    Serve {
        #[arg(short, long)]
        index: PathBuf,
    },
    /// Run a single query and print the results
    Search {
        query: String,
        #[arg(short, long)]
        index: PathBuf,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an index file and print its statistics
    Check {
        #[arg(short, long)]
        index: PathBuf,
    },
}
