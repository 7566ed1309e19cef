//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Saldo - Summarize credit-card installment statements
#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "Installment statement summarizer with AI advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the upload API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on (defaults to $PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize a statement file and print the JSON response
    Extract {
        /// Statement workbook to read
        #[arg(short, long)]
        file: PathBuf,

        /// Requested installment count
        #[arg(long, default_value = "1")]
        cuotas: String,

        /// Skip the advisory annotation pass
        #[arg(long)]
        no_advice: bool,
    },
}
