//! CLI parse: clap types for crudlist. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crudlist CLI - browse, select and delete items of a remote collection
#[derive(Parser)]
#[command(name = "crudlist")]
#[command(about = "Paginated, filterable view over a remote collection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding `config/config.toml`
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Collection endpoint (overrides configuration)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print pages of the collection
    List {
        /// Free-text search keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Filter as name=value (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Sort as field or field:asc|desc
        #[arg(long)]
        sort: Option<String>,
        /// Items per page (overrides configuration)
        #[arg(long)]
        page_size: Option<u32>,
        /// Number of pages to walk through next tokens
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the ids of every item matching the query
    Ids {
        /// Free-text search keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Filter as name=value (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Delete one item by id
    Delete {
        /// Item id
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}
