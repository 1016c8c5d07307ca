//! Error types for input loading.

use std::path::PathBuf;

use rdfmap_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading tables, ontologies or settings.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    #[error("empty column name at position {position} in {path}")]
    EmptyColumnName { path: PathBuf, position: usize },

    // === Document Errors ===
    #[error("invalid ontology document {path}: {source}")]
    OntologyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{context}: {source}")]
    Model {
        context: String,
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
