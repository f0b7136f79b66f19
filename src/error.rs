//! Error types for word-association.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph-building operations.
pub type Result<T> = std::result::Result<T, WordGraphError>;

#[derive(Error, Debug)]
pub enum WordGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV header has no column with the requested name.
    #[error("column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("GML parse error at line {line}: {message}")]
    Gml { line: usize, message: String },

    #[error("malformed WordNet file {path} at line {line}: {message}")]
    WordNet {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("no synonym source configured (set --wordnet, WORDNET_DIR or --thesaurus)")]
    NoSynonymSource,

    #[error("{program} exited with {status}")]
    Render { program: String, status: String },
}

impl WordGraphError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WordGraphError::File {
            path: path.into(),
            source,
        }
    }
}
