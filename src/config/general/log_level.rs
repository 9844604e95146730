use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity of log output.
///
/// Used as the filter directive when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors.
    Error,

    /// Warnings, such as absorbed load failures.
    Warn,

    /// Device lifecycle and transition events.
    #[default]
    Info,

    /// Skipped control commands and property announcements.
    Debug,

    /// Everything.
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
