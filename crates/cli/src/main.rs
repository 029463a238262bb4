//! Ripple CLI - change impact analysis for TypeScript/JavaScript projects

use anyhow::Result;
use clap::Parser;
use ripple_cli::{commands, default_log_filter, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli.verbose))),
        )
        .init();

    match cli.command {
        Commands::Impact {
            ref targets,
            ref changes,
            max_depth,
            ref path,
        } => {
            commands::impact::run(
                targets,
                changes.as_deref(),
                max_depth,
                path.as_deref(),
                cli.format,
            )?;
        }
        Commands::Graph { ref path } => {
            commands::graph::run(path.as_deref(), cli.format)?;
        }
        Commands::Init { ref path } => {
            commands::init::run(path.as_deref())?;
        }
    }

    Ok(())
}
