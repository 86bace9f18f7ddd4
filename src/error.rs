//! Unified error types for the installer

use crate::form::StatusMessage;
use thiserror::Error;

/// Rejection raised before any command is synthesized
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Published path is empty after trimming
    #[error("published path is empty")]
    EmptyPath,

    /// Service name is empty after trimming
    #[error("service name is empty")]
    EmptyName,
}

/// Main error type for installer operations
#[derive(Error, Debug)]
pub enum InstallerError {
    /// Form input rejected
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// An install is already executing
    #[error("An install is already in progress")]
    AlreadyRunning,

    /// Service control program could not be launched
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Submission finished with an error message for the operator
    #[error("{0}")]
    Reported(StatusMessage),

    /// Background worker disappeared before reporting
    #[error("Install worker stopped without reporting a result")]
    WorkerLost,

    /// Config file could not be read or parsed
    #[error("Failed to load config file '{path}': {message}")]
    Config { path: String, message: String },

    /// Windowing or shell API failure
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Ui(#[from] windows::core::Error),
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;

impl InstallerError {
    /// Create a config error for the given file
    pub fn config(path: impl AsRef<std::path::Path>, message: impl std::fmt::Display) -> Self {
        Self::Config {
            path: path.as_ref().to_string_lossy().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a spawn error for the given program
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}
