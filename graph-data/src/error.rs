//! Error types for dataset construction.

use std::path::PathBuf;

use graph_core::GraphError;
use thiserror::Error;

/// Errors that can occur while building or loading a dataset.
#[derive(Error, Debug)]
pub enum DataError {
    /// Instance file is not valid JSON or the model builder rejected it.
    #[error("Malformed instance {}: {reason}", .path.display())]
    MalformedInstance {
        /// Instance file.
        path: PathBuf,
        /// Parser or builder message.
        reason: String,
    },

    /// Instance file name does not end in `_<index>.json`.
    #[error("Cannot derive instance index from file name {}", .0.display())]
    InstanceName(PathBuf),

    /// Precomputed solution archive is absent. Recoverable: the instance is skipped.
    #[error("Solutions were not computed for {}", .0.display())]
    MissingSolution(PathBuf),

    /// Solutions directory does not exist.
    #[error("Solutions directory does not exist: {}", .0.display())]
    MissingSolutionDir(PathBuf),

    /// Solution archive exists but could not be read.
    #[error("Failed to read solutions from {}: {source}", .path.display())]
    SolutionRead {
        /// Solution archive.
        path: PathBuf,
        /// Underlying npz error.
        #[source]
        source: ndarray_npy::ReadNpzError,
    },

    /// Split name is not `train`, `val`, `test` or `all`.
    #[error("Unknown split: {0:?}")]
    UnknownSplit(String),

    /// Filesystem error.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Graph cache could not be written or read back.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Graph encoding failed.
    #[error("Graph encoding failed: {0}")]
    Graph(#[from] GraphError),
}

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
