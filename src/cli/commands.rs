//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paged collection retrieval for directory and device-management APIs
#[derive(Parser, Debug)]
#[command(name = "dirpager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fetch profile (YAML or JSON)
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

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
    /// Fetch every item of the profile's collection and print it
    Fetch {
        /// Use this URL instead of the profile's
        #[arg(long)]
        url: Option<String>,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,

        /// Only print the number of items
        #[arg(long)]
        count: bool,
    },

    /// Validate a profile without making requests
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Indented JSON, one item after another
    Pretty,
}
