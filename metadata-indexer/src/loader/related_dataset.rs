//! Related-dataset reverse index.
//!
//! Child (level-2) records reference their parent dataset. After the primary
//! pass the references are inverted and sent to the parent (level-1) core as
//! atomic updates, so every parent lists the children pointing at it.

use std::collections::{BTreeMap, BTreeSet};

use metadata_indexer_repository::SubmissionSummary;
use metadata_indexer_shared::BackendDocument;

use crate::processor::RELATED_DATASET_FIELD;

/// Referenced dataset id mapped to the ids of the records referencing it.
///
/// Accumulated during one run and discarded once flushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedDatasetIndex {
    references: BTreeMap<String, BTreeSet<String>>,
}

impl RelatedDatasetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `referencing_id` points at `related_id`.
    pub fn record(&mut self, related_id: &str, referencing_id: &str) {
        self.references
            .entry(related_id.to_string())
            .or_default()
            .insert(referencing_id.to_string());
    }

    /// Ids referencing `related_id`, if any.
    pub fn referencing(&self, related_id: &str) -> Option<&BTreeSet<String>> {
        self.references.get(related_id)
    }

    /// Number of distinct referenced datasets.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// One atomic update per referenced dataset:
    /// `{"id": related, "mmd_related_dataset": {"set": [ids...]}}`.
    pub fn documents(&self) -> Vec<BackendDocument> {
        self.references
            .iter()
            .map(|(related_id, referencing)| {
                let mut document = BackendDocument::new(related_id.as_str());
                document.set_field(RELATED_DATASET_FIELD, referencing.iter().cloned());
                document
            })
            .collect()
    }
}

/// What happened to the related-dataset index at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedOutcome {
    /// Related-dataset tracking was off for this run.
    Disabled,
    /// No record referenced another dataset.
    NothingToIndex,
    /// The backend URL does not follow the level-2 convention, so there is no
    /// parent core to update.
    Skipped { base_url: String },
    /// The updates were submitted to the parent core.
    Indexed {
        target_url: String,
        summary: SubmissionSummary,
    },
}
