//! # CLI Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  io::Error / CoreError / ExportError                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (this module) ← Adds the file or directory involved          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  main: logged, printed to stderr, exit code 2                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use ebon_core::CoreError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file or creating an output directory failed.
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Input is not a receipt.
    #[error("{}: {source}", .path.display())]
    Decode { path: PathBuf, source: CoreError },

    /// A decoded receipt could not be written back out.
    #[error("Failed to encode receipt: {0}")]
    Encode(#[source] CoreError),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ts-rs could not write the TypeScript definitions.
    #[error("Failed to export TypeScript bindings to {}: {source}", .dir.display())]
    Bindings {
        dir: PathBuf,
        source: ts_rs::ExportError,
    },
}

pub type CliResult<T> = Result<T, CliError>;
