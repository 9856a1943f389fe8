//! Error types for the shoebox core.
//!
//! Every fallible core operation returns [`Result`] so callers decide
//! per call site whether a failure is fatal or skippable: the ingestion
//! orchestrator aggregates per-file errors into its report, while the CLI
//! and HTTP boundaries propagate them to the caller.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using shoebox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the ingestion pipeline and query layer.
#[derive(Error, Debug)]
pub enum Error {
    /// File read, write, or copy failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Insert rejected by a uniqueness invariant (duplicate content digest).
    #[error("image with digest {digest} already exists")]
    ConstraintViolation { digest: String },

    /// Lookup by an id or name that does not exist.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// Unparseable request parameters at a boundary.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// The batch was cancelled before this file was processed.
    #[error("operation cancelled")]
    Cancelled,

    /// Database failure outside the taxonomy above.
    #[error("database error: {source}")]
    Db {
        #[from]
        source: sqlx::Error,
    },
}

impl Error {
    /// I/O error carrying the path it occurred at.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Lookup miss for the given entity kind and key.
    pub fn not_found(what: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            what,
            key: key.to_string(),
        }
    }

    /// Boundary parse failure.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            reason: reason.into(),
        }
    }
}
