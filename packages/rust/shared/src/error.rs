//! Error types for orgscrape.
//!
//! Library crates use [`OrgScrapeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all orgscrape operations.
#[derive(Debug, thiserror::Error)]
pub enum OrgScrapeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network failure or non-success HTTP status while fetching a page.
    #[error("fetch error: {url}: {message}")]
    Fetch {
        url: String,
        /// Upstream HTTP status, when the server answered at all.
        status: Option<u16>,
        message: String,
    },

    /// The response body could not be treated as an HTML document.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Caller input rejected before any network call (malformed URL etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON/TOML encoding error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OrgScrapeError>;

impl OrgScrapeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a fetch error for a transport failure (no HTTP status).
    pub fn network(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: None,
            message: msg.into(),
        }
    }

    /// Create a fetch error for a non-success HTTP status.
    pub fn http_status(url: impl Into<String>, status: u16, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: Some(status),
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

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Upstream HTTP status carried by a fetch error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}
