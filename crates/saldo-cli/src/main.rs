//! Saldo CLI - installment statement summarizer
//!
//! Usage:
//!   saldo serve --port 3000          Start the upload API server
//!   saldo extract --file export.xlsx Summarize a statement locally

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve { host, port } => commands::cmd_serve(&host, port).await,
        Commands::Extract {
            file,
            cuotas,
            no_advice,
        } => commands::cmd_extract(&file, &cuotas, no_advice).await,
    }
}
