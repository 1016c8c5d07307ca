//! Error types for mapping generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a generation run.
///
/// Columns without a match are not errors; they end up in the alignment
/// report as unmapped records.
#[derive(Debug, Error)]
pub enum GeneratorError {
    // === Resolution ===
    /// An explicitly requested class is not in the ontology.
    #[error("could not find class: {identifier}")]
    ClassNotFound { identifier: String },

    /// No class was requested and none could be inferred.
    #[error("could not auto-detect target class; please specify one")]
    NoTargetClass,

    // === Serialization ===
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A report file could not be parsed.
    #[error("invalid alignment report {path}: {source}")]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === File System ===
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// True for the errors raised while resolving the target class.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::ClassNotFound { .. } | Self::NoTargetClass)
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
