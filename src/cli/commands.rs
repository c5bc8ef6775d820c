//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated job listing client
#[derive(Parser, Debug)]
#[command(name = "jobpager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides the config file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of jobs
    Page {
        /// Job status to list (e.g. queued, running, completed)
        #[arg(long)]
        status: String,

        /// Free-text filter
        #[arg(short, long)]
        query: Option<String>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Cursor from a previous page's endCursor
        #[arg(short, long)]
        after: Option<String>,
    },

    /// Fetch consecutive pages by following cursors
    Walk {
        /// Job status to list
        #[arg(long)]
        status: String,

        /// Free-text filter
        #[arg(short, long)]
        query: Option<String>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Stop after this many pages (0 = no limit)
        #[arg(long, default_value = "0")]
        max_pages: usize,
    },

    /// Wrap a continuation location into an opaque cursor
    EncodeCursor {
        /// Continuation location, e.g. /jobs/queued?after=2
        raw: String,
    },

    /// Unwrap an opaque cursor
    DecodeCursor {
        /// Cursor value
        cursor: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
