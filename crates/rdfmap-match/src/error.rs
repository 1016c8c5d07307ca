//! Error types for matching operations.

use std::path::PathBuf;

use thiserror::Error;

/// A matcher-local failure.
///
/// The pipeline logs these and treats the matcher as having produced no
/// candidate; they never abort a run.
#[derive(Debug, Error)]
pub enum MatcherError {
    /// A backing resource (embedding model, index) is unusable.
    #[error("{matcher}: resource unavailable: {message}")]
    Unavailable { matcher: String, message: String },

    /// The embedding model failed on a specific input.
    #[error("embedding failed for '{text}': {message}")]
    Embedding { text: String, message: String },
}

/// Errors from loading or saving a match history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read match history {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write match history {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid match history {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize match history: {0}")]
    Serialize(#[source] serde_json::Error),
}
