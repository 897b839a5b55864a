//! Error types for KitGuide.
//!
//! Library crates use [`KitGuideError`] via `thiserror`.
//! The CLI wraps this with `color-eyre`; the server maps it to HTTP statuses.

use std::path::PathBuf;

/// Top-level error type for all KitGuide operations.
#[derive(Debug, thiserror::Error)]
pub enum KitGuideError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Kit data file could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Kit data violates a catalog invariant (duplicate ids, stage names, ...).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// No kit matches the given kit ID or order ID.
    #[error("kit not found: {identifier}")]
    KitNotFound { identifier: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// HTTP listener bind or serve failure.
    #[error("server error: {0}")]
    Server(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KitGuideError>;

impl KitGuideError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a not-found error for the identifier the caller supplied.
    pub fn kit_not_found(identifier: impl Into<String>) -> Self {
        Self::KitNotFound {
            identifier: identifier.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested kit does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KitNotFound { .. })
    }
}
