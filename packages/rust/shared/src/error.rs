//! Error types for bibcloud.
//!
//! Library crates use [`BibcloudError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bibcloud operations.
#[derive(Debug, thiserror::Error)]
pub enum BibcloudError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Paginated document could not be loaded.
    #[error("document error at {path:?}: {message}")]
    Document { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad vocabulary tables, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Writing the text dump, frequency table, or summary failed.
    #[error("output error: {0}")]
    Output(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BibcloudError>;

impl BibcloudError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a document error for the given file.
    pub fn document(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Document {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
