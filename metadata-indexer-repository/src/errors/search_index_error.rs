//! Search index error types.
//!
//! This module defines the unified error type for all search backend operations,
//! including both transport failures and rejected requests.

use thiserror::Error;

/// Unified errors from search backend operations.
///
/// Used by the `SearchIndexProvider` trait and `SearchIndexService`. Any of these
/// returned while submitting a batch terminates the submission sequence.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., malformed base URL, zero batch size).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to add documents.
    #[error("Add error: {0}")]
    AddError(String),

    /// Failed to commit pending changes.
    #[error("Commit error: {0}")]
    CommitError(String),

    /// Failed to delete documents.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to parse response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize documents for the search backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an add error.
    pub fn add(msg: impl Into<String>) -> Self {
        Self::AddError(msg.into())
    }

    /// Create a commit error.
    pub fn commit(msg: impl Into<String>) -> Self {
        Self::CommitError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

impl From<reqwest::Error> for SearchIndexError {
    fn from(err: reqwest::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

impl From<url::ParseError> for SearchIndexError {
    fn from(err: url::ParseError) -> Self {
        Self::ValidationError(format!("Invalid base URL: {}", err))
    }
}
