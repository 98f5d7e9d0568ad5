//! Search index service implementation.
//!
//! This module provides the batch submitter used by application code. It owns
//! the chunking, commit and dry-run policy and delegates the raw protocol calls
//! to a `SearchIndexProvider`.
//!
//! # Delivery semantics
//!
//! Documents are sent in chunks, each chunk followed by a commit. A failure on
//! any chunk stops the sequence: earlier chunks stay committed, later chunks are
//! never attempted and nothing is retried.

use metadata_indexer_shared::BackendDocument;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::SubmissionSummary;

/// Query matching every document of a core.
pub const MATCH_ALL_QUERY: &str = "*:*";

/// The main service for writing to the search backend.
///
/// # Example
///
/// ```no_run
/// use metadata_indexer_repository::{SearchIndexService, SolrProvider};
/// use metadata_indexer_shared::BackendDocument;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Box::new(SolrProvider::new("http://localhost:8983/solr/l2")?);
/// let service = SearchIndexService::new(provider);
///
/// let documents = vec![BackendDocument::new("dataset-1")];
/// service.submit(&documents).await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchIndexService {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration
    /// (chunks of 500, dry-run off).
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    pub fn with_config(
        provider: Box<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// The base URL of the core currently targeted.
    pub fn base_url(&self) -> String {
        self.provider.base_url()
    }

    /// Submit documents in chunks, each chunk added and then committed.
    ///
    /// In dry-run mode no backend call is made and the documents are only
    /// counted.
    ///
    /// # Returns
    ///
    /// * `Ok(SubmissionSummary)` - Every chunk was added and committed
    /// * `Err(SearchIndexError)` - The first failing call; later chunks were not attempted
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn submit(
        &self,
        documents: &[BackendDocument],
    ) -> Result<SubmissionSummary, SearchIndexError> {
        if self.config.batch_size == 0 {
            return Err(SearchIndexError::validation("Batch size must be at least 1"));
        }

        let mut summary = SubmissionSummary {
            total: documents.len(),
            chunks_committed: 0,
            dry_run: self.config.dry_run,
        };

        if self.config.dry_run {
            debug!(count = documents.len(), "Dry run, skipping submission");
            return Ok(summary);
        }

        for (index, chunk) in documents.chunks(self.config.batch_size).enumerate() {
            if let Err(e) = self.add_and_commit(chunk).await {
                error!(
                    chunk = index,
                    chunk_size = chunk.len(),
                    chunks_committed = summary.chunks_committed,
                    error = %e,
                    "Chunk submission failed, abandoning remaining chunks"
                );
                return Err(e);
            }
            summary.chunks_committed += 1;
            debug!(chunk = index, chunk_size = chunk.len(), "Chunk committed");
        }

        Ok(summary)
    }

    async fn add_and_commit(&self, chunk: &[BackendDocument]) -> Result<(), SearchIndexError> {
        self.provider.add(chunk).await?;
        self.provider.commit().await
    }

    /// Submit documents to another core, then point the provider back at the
    /// core it targeted before.
    ///
    /// The original target is restored whether or not the submission succeeded.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn submit_at(
        &mut self,
        base_url: &str,
        documents: &[BackendDocument],
    ) -> Result<SubmissionSummary, SearchIndexError> {
        if self.config.dry_run {
            debug!(target_url = %base_url, count = documents.len(), "Dry run, skipping submission");
            return self.submit(documents).await;
        }

        let original = self.provider.base_url();
        self.provider.set_base_url(base_url)?;
        info!(from = %original, to = %base_url, "Re-targeted search backend");

        let result = self.submit(documents).await;

        if let Err(e) = self.provider.set_base_url(&original) {
            warn!(url = %original, error = %e, "Failed to restore search backend target");
        }

        result
    }

    /// Delete every document of the targeted core and commit.
    ///
    /// Suppressed in dry-run mode.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), SearchIndexError> {
        if self.config.dry_run {
            debug!("Dry run, skipping clear");
            return Ok(());
        }

        self.provider.delete_by_query(MATCH_ALL_QUERY).await?;
        self.provider.commit().await?;

        info!(url = %self.provider.base_url(), "Cleared search index");
        Ok(())
    }
}
