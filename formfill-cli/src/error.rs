//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use formfill::run::RunError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Failed to read the template file
    Template { path: PathBuf, error: io::Error },
    /// Failed to read or parse the rows file
    Rows { path: PathBuf, message: String },
    /// Failed to create the output directory
    OutDir { path: PathBuf, error: io::Error },
    /// The generation run failed
    Run(RunError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Rows { .. } => {
                eprintln!();
                eprintln!("The rows file must be a JSON array of objects mapping");
                eprintln!("column names to string values, for example:");
                eprintln!("  [{{\"name\": \"Ada\", \"id\": \"1\"}}]");
            }
            CliError::Run(RunError::Aborted { .. }) => {
                eprintln!();
                eprintln!("Re-run with --skip-errors to continue past item failures.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(error) => write!(f, "Failed to initialize logging: {}", error),
            CliError::Template { path, error } => {
                write!(f, "Failed to read template {}: {}", path.display(), error)
            }
            CliError::Rows { path, message } => {
                write!(f, "Failed to load rows from {}: {}", path.display(), message)
            }
            CliError::OutDir { path, error } => write!(
                f,
                "Failed to create output directory {}: {}",
                path.display(),
                error
            ),
            CliError::Run(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(error) => Some(error),
            CliError::Template { error, .. } => Some(error),
            CliError::OutDir { error, .. } => Some(error),
            CliError::Run(error) => Some(error),
            CliError::Rows { .. } => None,
        }
    }
}
