//! CLI module for vidlib.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidlib - video library API with semantic search
///
/// Streams a directory of lecture videos over HTTP and answers natural-language
/// queries against a vector index of their transcripts.
#[derive(Parser, Debug)]
#[command(name = "vidlib")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a search from the command line
    Search {
        /// Search query
        query: String,

        /// Number of matches to request from the index
        #[arg(short = 'k', long)]
        top_k: Option<i64>,

        /// Skip answer synthesis
        #[arg(long)]
        no_answer: bool,
    },

    /// Show vector index statistics
    Stats,

    /// Check configuration and external services
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a configuration file with the current settings
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
