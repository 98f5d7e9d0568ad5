//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search backend operations,
//! allowing for different backend implementations (Solr, test doubles, etc.).

use async_trait::async_trait;
use metadata_indexer_shared::BackendDocument;

use crate::errors::SearchIndexError;

/// Abstracts the underlying search backend.
///
/// Implementations are injected into `SearchIndexService`, which owns the
/// batching, commit and dry-run policy. Providers only perform the raw protocol
/// calls and never retry.
///
/// # Base URL
///
/// The provider targets one logical partition (a Solr core) identified by its
/// base URL. The related-dataset pass reads the base URL, derives the sibling
/// partition from it and re-targets the provider with `set_base_url`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Send a batch of documents to the backend. Changes are not visible until
    /// `commit` is called.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the backend accepted every document
    /// * `Err(SearchIndexError)` - If the transport failed or the backend rejected the batch
    async fn add(&self, documents: &[BackendDocument]) -> Result<(), SearchIndexError>;

    /// Commit all pending changes.
    async fn commit(&self) -> Result<(), SearchIndexError>;

    /// Delete every document matching `query` (e.g. `*:*` for the whole partition).
    async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError>;

    /// The base URL of the partition currently targeted.
    fn base_url(&self) -> String;

    /// Re-target the provider at another partition.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the URL is valid and now targeted
    /// * `Err(SearchIndexError)` - If the URL cannot be parsed; the previous target is kept
    fn set_base_url(&mut self, url: &str) -> Result<(), SearchIndexError>;
}
