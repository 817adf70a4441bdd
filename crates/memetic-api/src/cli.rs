//! CLI command definitions for the `memetic` binary.
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Meme-agent conversation backend.
#[derive(Parser)]
#[command(name = "memetic", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Export traces via OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Initialize the data directory, database, and first API key.
    Init,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
