//! Error types for the metadata indexer ingest.

use metadata_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the metadata indexer ingest.
///
/// Parse and I/O errors are contained to the record that produced them; loader
/// errors end the run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error from the loader component (backend submission failed).
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Malformed XML metadata.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to read a metadata file or directory.
    #[error("IO error: {0}")]
    IoError(String),
}

impl IngestError {
    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an IO error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }
}

impl From<SearchIndexError> for IngestError {
    fn from(err: SearchIndexError) -> Self {
        Self::LoaderError(err.to_string())
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
