use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::services::cast::CastError;
use crate::services::mpris::MprisError;

/// Error types for the bridge.
///
/// Covers configuration loading plus the errors of the receiver and MPRIS
/// services, so binaries can propagate everything with `?`.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration field holds an unusable value
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// I/O operation error with path context
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Receiver side failure
    #[error(transparent)]
    Cast(#[from] CastError),

    /// MPRIS export failure
    #[error(transparent)]
    Mpris(#[from] MprisError),
}

/// Result alias using [`BridgeError`]
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Build a TOML parse error, naming the file when known
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => p
                .canonicalize()
                .unwrap_or_else(|_| p.to_path_buf())
                .display()
                .to_string(),
            None => "string".to_string(),
        };

        BridgeError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Build an I/O error naming the file involved
    pub fn io(error: &std::io::Error, path: &Path) -> Self {
        BridgeError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
