//! # Metadata Indexer
//!
//! Flattens XML dataset metadata records into field documents and indexes them
//! into Solr.
//!
//! ## Architecture
//!
//! The indexer follows the Processor-Loader pattern:
//!
//! 1. **Processor**: Flattens metadata XML and builds backend documents
//! 2. **Loader**: Submits documents in committed chunks and indexes
//!    related-dataset links into the parent core
//! 3. **Orchestrator**: Walks the input files and coordinates the run
//!
//! ## Modules
//!
//! - [`config`]: Rule configuration and dependency initialization
//! - [`processor`]: Flattener, composition rules and document builder
//! - [`loader`]: Batched submission and the related-dataset index
//! - [`orchestrator`]: Coordinates an indexing run
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, IndexerCommand, IndexerConfig};
pub use errors::IngestError;
pub use orchestrator::{Orchestrator, RunSummary};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
