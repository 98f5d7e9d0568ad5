//! Configuration for the metadata indexer.

mod dependencies;
mod indexer_config;

pub use dependencies::{Dependencies, IndexerCommand};
pub use indexer_config::IndexerConfig;
