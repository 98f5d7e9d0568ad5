//! # Metadata Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search backend. It includes definitions for errors, the backend interface,
//! a concrete implementation for Solr, and the service that submits documents
//! in committed batches.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod service;
pub mod solr;
pub mod types;
pub mod utils;

pub use config::SearchIndexServiceConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use service::SearchIndexService;
pub use solr::SolrProvider;
pub use types::SubmissionSummary;
pub use utils::sibling_level_url;
