//! Error types for ProjectBook.
//!
//! Library crates use [`ProjectBookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all ProjectBook operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectBookError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTTP client construction or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// A hidden field the SSO login form must carry was not on the page.
    #[error("login form field `{field}` not found on the login page")]
    FormFieldMissing { field: String },

    /// The credential submission did not pass the login check.
    #[error("login rejected (HTTP {status})")]
    LoginRejected { status: u16 },

    /// The listing page could not be fetched.
    #[error("listing fetch failed: {0}")]
    ListingFetch(String),

    /// The listing page was fetched but its markup did not match expectations.
    #[error("listing parse failed: {message}")]
    ListingParse { message: String },

    /// A single project's detail page could not be fetched.
    #[error("detail fetch failed: {0}")]
    DetailFetch(String),

    /// PDF generation error.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ProjectBookError>;

impl ProjectBookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a listing parse error from any displayable message.
    pub fn listing_parse(msg: impl Into<String>) -> Self {
        Self::ListingParse {
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
