//! Error types for filecollectlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while collecting files
#[derive(Error, Debug)]
pub enum FilecollectError {
    /// Source path does not exist
    #[error("directory '{0}' does not exist")]
    SourceNotFound(PathBuf),

    /// Source path exists but is not a directory
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to read a single collected file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the aggregate output file
    #[error("failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilecollectError {
    /// Whether this error aborts a run before anything is collected.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FilecollectError::SourceNotFound(_) | FilecollectError::NotADirectory(_)
        )
    }
}
