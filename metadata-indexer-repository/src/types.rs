//! Response types for search index operations.

/// Summary of a submission through `SearchIndexService::submit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionSummary {
    /// Number of documents handed to the service.
    pub total: usize,
    /// Number of chunks that were added and committed.
    pub chunks_committed: usize,
    /// Whether the submission ran in dry-run mode (nothing sent).
    pub dry_run: bool,
}

impl SubmissionSummary {
    /// Merge the counts of a later submission into this one.
    pub fn absorb(&mut self, other: &SubmissionSummary) {
        self.total += other.total;
        self.chunks_committed += other.chunks_committed;
        self.dry_run |= other.dry_run;
    }
}
