//! # ebon
//!
//! Command line tooling for parsed eBon receipts.
//!
//! ## Usage
//! ```bash
//! # Validate receipts (exit code 1 if any has issues)
//! ebon check receipts/*.json
//! ebon check --json --tolerance-cents 0 receipt.json
//!
//! # Canonical JSON on stdout
//! cat receipt.json | ebon normalize -
//!
//! # Overview for humans
//! ebon summary receipt.json
//!
//! # TypeScript definitions for the web frontend
//! ebon bindings --out-dir web/src/types
//! ```
//!
//! ## Exit Codes
//! - `0`: success
//! - `1`: `check` found issues
//! - `2`: the command itself failed (bad config, unreadable file...)
//!
//! Logs go to stderr; see [`config`] for `EBON_LOG`.

mod commands;
mod config;
mod error;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ebon_core::ValidationOptions;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::commands::Outcome;
use crate::config::CliConfig;
use crate::error::CliResult;

#[derive(Parser)]
#[command(name = "ebon", version, about = "Check, normalize and summarize eBon receipt JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode and validate receipt files
    Check {
        /// Largest accepted rounding difference, in cents
        #[arg(long)]
        tolerance_cents: Option<i64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Receipt JSON files (`-` for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Re-encode a receipt as canonical JSON
    Normalize {
        /// Receipt JSON file (`-` for stdin)
        file: PathBuf,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Print a human-readable receipt overview
    Summary {
        /// Receipt JSON file (`-` for stdin)
        file: PathBuf,
    },

    /// Export TypeScript definitions of the receipt model
    Bindings {
        /// Output directory (default: EBON_BINDINGS_DIR or ./bindings)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&config.log_filter);
    debug!(?config, "configuration loaded");

    match run(cli.command, &config) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::IssuesFound) => ExitCode::from(1),
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command, config: &CliConfig) -> CliResult<Outcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Check {
            tolerance_cents,
            json,
            files,
        } => {
            let tolerance = tolerance_cents.unwrap_or(config.tolerance_cents);
            if tolerance < 0 {
                return Err(config::ConfigError::InvalidValue("--tolerance-cents".to_string()).into());
            }
            let options = ValidationOptions::with_tolerance_cents(tolerance);
            commands::check(&files, &options, json, &mut out)
        }
        Command::Normalize { file, compact } => {
            commands::normalize(&file, compact, &mut out)?;
            Ok(Outcome::Clean)
        }
        Command::Summary { file } => {
            commands::summary(&file, &mut out)?;
            Ok(Outcome::Clean)
        }
        Command::Bindings { out_dir } => {
            let dir = out_dir.unwrap_or_else(|| config.bindings_dir.clone());
            commands::bindings(&dir)?;
            Ok(Outcome::Clean)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `EBON_LOG=debug` - Show debug messages
/// - `EBON_LOG=ebon=trace` - Trace for this binary only
/// - Default: INFO level
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
