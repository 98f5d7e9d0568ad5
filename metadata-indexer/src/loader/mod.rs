//! Loader module for the metadata indexer.
//!
//! Buffers built documents, submits them through the `SearchIndexService` in
//! committed chunks and, at the end of a run, sends the related-dataset index to
//! the parent core.

mod related_dataset;

pub use related_dataset::{RelatedDatasetIndex, RelatedOutcome};

use metadata_indexer_repository::{sibling_level_url, SearchIndexService, SubmissionSummary};
use metadata_indexer_shared::BackendDocument;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;

/// Loader that indexes documents into the search backend.
///
/// The loader is responsible for:
/// - Buffering documents until a full chunk is available
/// - Accumulating the related-dataset index when tracking is enabled
/// - Flushing that index to the level-1 core once the primary pass is done
pub struct SearchLoader {
    service: SearchIndexService,
    pending: Vec<BackendDocument>,
    related: Option<RelatedDatasetIndex>,
    submitted: SubmissionSummary,
}

impl SearchLoader {
    /// Create a loader without related-dataset tracking.
    pub fn new(service: SearchIndexService) -> Self {
        let batch_size = service.batch_size();
        Self {
            service,
            pending: Vec::with_capacity(batch_size),
            related: None,
            submitted: SubmissionSummary::default(),
        }
    }

    /// Create a loader that accumulates related-dataset references.
    pub fn with_related_tracking(service: SearchIndexService) -> Self {
        Self {
            related: Some(RelatedDatasetIndex::new()),
            ..Self::new(service)
        }
    }

    pub fn tracks_related(&self) -> bool {
        self.related.is_some()
    }

    /// The related-dataset index of the current run, when tracking is enabled.
    pub fn related_index_mut(&mut self) -> Option<&mut RelatedDatasetIndex> {
        self.related.as_mut()
    }

    /// Documents accepted by the backend since the last call, resetting the count.
    pub fn take_submitted(&mut self) -> SubmissionSummary {
        std::mem::take(&mut self.submitted)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a document, flushing once a full chunk is buffered.
    pub async fn load(&mut self, document: BackendDocument) -> Result<(), IngestError> {
        self.pending.push(document);

        if self.pending.len() >= self.service.batch_size() {
            self.flush().await?;
        }

        Ok(())
    }

    /// Submit every buffered document.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let documents: Vec<BackendDocument> = self.pending.drain(..).collect();
        let count = documents.len();

        debug!(count = count, "Flushing documents to search index");

        match self.service.submit(&documents).await {
            Ok(summary) => {
                self.submitted.absorb(&summary);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, count = count, "Failed to submit documents");
                Err(IngestError::loader(format!(
                    "Failed to submit {} documents: {}",
                    count, e
                )))
            }
        }
    }

    /// Send the related-dataset index to the level-1 core and reset it.
    ///
    /// The index is only sent when the backend URL ends with the level-2
    /// suffix; otherwise the outcome is `Skipped` and nothing is submitted.
    #[instrument(skip(self))]
    pub async fn flush_related(&mut self) -> Result<RelatedOutcome, IngestError> {
        let Some(index) = self.related.as_mut() else {
            return Ok(RelatedOutcome::Disabled);
        };
        let index = std::mem::take(index);

        if index.is_empty() {
            info!("No related datasets to index");
            return Ok(RelatedOutcome::NothingToIndex);
        }

        let base_url = self.service.base_url();
        let Some(target_url) = sibling_level_url(&base_url) else {
            warn!(
                base_url = %base_url,
                related_count = index.len(),
                "Backend URL is not a level-2 core, skipping related datasets"
            );
            return Ok(RelatedOutcome::Skipped { base_url });
        };

        let documents = index.documents();
        info!(
            target_url = %target_url,
            count = documents.len(),
            "Indexing related datasets"
        );

        let summary = self
            .service
            .submit_at(&target_url, &documents)
            .await
            .map_err(|e| {
                error!(error = %e, target_url = %target_url, "Failed to index related datasets");
                IngestError::loader(format!(
                    "Failed to index {} related datasets at {}: {}",
                    documents.len(),
                    target_url,
                    e
                ))
            })?;

        Ok(RelatedOutcome::Indexed {
            target_url,
            summary,
        })
    }

    /// Delete every document of the targeted core.
    pub async fn clear(&self) -> Result<(), IngestError> {
        self.service.clear().await.map_err(|e| {
            error!(error = %e, "Failed to clear search index");
            IngestError::loader(format!("Failed to clear search index: {}", e))
        })
    }
}
