//! CLI command definitions for the `kokoro` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod check;
pub mod persona;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kokoro_infra::config::DEFAULT_CONFIG_FILE;

/// Persona chat backend.
#[derive(Parser)]
#[command(name = "kokoro", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "KOKORO_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// List the available personas.
    Personas,

    /// Send a one-shot request to the completion provider.
    Check,
}
