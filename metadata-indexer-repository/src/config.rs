//! Configuration types for the SearchIndexService.

/// Number of documents sent per add+commit round trip.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Configuration for the SearchIndexService.
#[derive(Debug, Clone)]
pub struct SearchIndexServiceConfig {
    /// Number of documents per chunk. Every chunk is added and committed
    /// before the next one is attempted.
    pub batch_size: usize,

    /// When set, documents are accepted and counted but no add, commit or
    /// delete call ever reaches the backend.
    pub dry_run: bool,
}

impl Default for SearchIndexServiceConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }
}

impl SearchIndexServiceConfig {
    /// Create a config that suppresses every backend mutation.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Create a config with a custom chunk size.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Number of documents per add+commit round trip
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }
}
