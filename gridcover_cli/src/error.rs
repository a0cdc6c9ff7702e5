// Copyright 2025 the Gridcover Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CLI errors with user-facing messages.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use gridcover_index::GridError;

/// Errors that abort a whole run.
///
/// Problems with a single input row never end up here; those are logged and
/// the row is skipped.
#[derive(Debug)]
pub(crate) enum CliError {
    /// Failed to install the log subscriber.
    LoggingInit(String),
    /// The cell size does not describe a usable grid.
    Grid(GridError),
    /// Failed to build the worker pool.
    ThreadPool(String),
    /// Failed to open or read the input.
    Input {
        path: Option<PathBuf>,
        error: io::Error,
    },
    /// Failed to write results.
    Output(io::Error),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub(crate) fn exit(&self) -> ! {
        eprintln!("Error: {self}");
        if let Self::Grid(GridError::InvalidCellSize { .. }) = self {
            eprintln!();
            eprintln!("The cell size is in degrees: a positive number no larger than 180,");
            eprintln!("for example --cell-size 0.5 for half-degree cells.");
        }
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggingInit(msg) => write!(f, "Failed to initialize logging: {msg}"),
            Self::Grid(e) => write!(f, "Invalid grid: {e}"),
            Self::ThreadPool(msg) => write!(f, "Failed to start worker threads: {msg}"),
            Self::Input {
                path: Some(path),
                error,
            } => write!(f, "Failed to read '{}': {error}", path.display()),
            Self::Input { path: None, error } => write!(f, "Failed to read stdin: {error}"),
            Self::Output(e) => write!(f, "Failed to write output: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Input { error, .. } => Some(error),
            Self::Output(e) => Some(e),
            Self::LoggingInit(_) | Self::ThreadPool(_) => None,
        }
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
