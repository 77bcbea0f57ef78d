//! CLI-specific error types with exit codes.
//!
//! Wraps engine errors and maps them to distinct process exit codes so
//! scripts can tell a scheduling failure from a usage error.

use std::fmt;

use catlodge::Error as EngineError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Engine error (wrapped).
    Engine(EngineError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Scheduling or validation failure (caller-fixable)
    /// - 2: Store lock timeout
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other engine error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(err) => match err {
                EngineError::LockTimeout { .. } => 2,
                // Everything carrying a taxonomy code is caller-fixable.
                e if e.code().is_some() => 1,
                _ => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => match e.code() {
                Some(code) => write!(f, "[{code}] {e}"),
                None => write!(f, "{e}"),
            },
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Engine(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
