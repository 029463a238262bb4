//! Ripple CLI library, exposed for integration tests

pub mod commands;
pub mod output;
pub mod progress;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ripple")]
#[command(about = "Find every caller a function change can reach", long_about = None)]
#[command(version = ripple_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "terminal")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report the callers a change to the given functions can reach
    Impact {
        /// Changed functions as <file>:<function>, paths relative to the project root
        targets: Vec<String>,

        /// JSON file listing changed functions
        #[arg(long)]
        changes: Option<PathBuf>,

        /// Caller expansion depth (overrides .ripple.toml)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Build the call graph and print its nodes and edges
    Graph {
        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Initialize .ripple.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
