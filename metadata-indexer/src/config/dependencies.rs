//! Dependency initialization and wiring for the metadata indexer.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::IndexerConfig;
use crate::loader::SearchLoader;
use crate::orchestrator::Orchestrator;
use crate::IndexingError;
use metadata_indexer_repository::config::DEFAULT_BATCH_SIZE;
use metadata_indexer_repository::{SearchIndexService, SearchIndexServiceConfig, SolrProvider};

/// Default Solr core URL.
const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/l2";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerCommand {
    /// Index every metadata file of a directory.
    IndexMetadata { source_directory: PathBuf },
    /// Index one metadata file.
    IndexSingleMetadata { metadata_file: PathBuf },
    /// Delete every document of the target core.
    Clear,
}

impl IndexerCommand {
    /// Parse the command from `INDEXER_COMMAND` and its companion variable.
    ///
    /// Valid values: "index-metadata" (needs `SOURCE_DIRECTORY`),
    /// "index-single-metadata" (needs `METADATA_FILE`) or "clear".
    /// Defaults to "index-metadata".
    fn from_env() -> Result<Self, IndexingError> {
        let command = env::var("INDEXER_COMMAND")
            .unwrap_or_else(|_| "index-metadata".to_string())
            .to_lowercase();

        match command.as_str() {
            "index-metadata" => Ok(Self::IndexMetadata {
                source_directory: required_path("SOURCE_DIRECTORY")?,
            }),
            "index-single-metadata" => Ok(Self::IndexSingleMetadata {
                metadata_file: required_path("METADATA_FILE")?,
            }),
            "clear" => Ok(Self::Clear),
            other => Err(IndexingError::config(format!(
                "Unknown INDEXER_COMMAND '{}', expected index-metadata, index-single-metadata or clear",
                other
            ))),
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The command to run.
    pub command: IndexerCommand,
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INDEXER_COMMAND`: "index-metadata", "index-single-metadata" or "clear" (default: index-metadata)
    /// - `SOURCE_DIRECTORY`: Directory of metadata files for index-metadata
    /// - `METADATA_FILE`: Metadata file for index-single-metadata
    /// - `SOLR_URL`: Solr core URL (default: http://localhost:8983/solr/l2)
    /// - `INCLUDE_RELATED_DATASET`: Index parent/child links into the level-1 core (default: false)
    /// - `DRY_RUN`: Build documents without touching Solr (default: false)
    /// - `METADATA_CONFIG`: Rule configuration file (default: embedded configuration)
    /// - `SUBMIT_BATCH_SIZE`: Documents per add+commit round trip (default: 500)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a variable is missing or invalid
    pub fn new() -> Result<Self, IndexingError> {
        let command = IndexerCommand::from_env()?;
        let solr_url = env::var("SOLR_URL").unwrap_or_else(|_| DEFAULT_SOLR_URL.to_string());
        let include_related = env_flag("INCLUDE_RELATED_DATASET");
        let dry_run = env_flag("DRY_RUN");
        let config_path = env::var("METADATA_CONFIG").ok().map(PathBuf::from);
        let batch_size = match env::var("SUBMIT_BATCH_SIZE") {
            Ok(value) => value
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    IndexingError::config(format!(
                        "SUBMIT_BATCH_SIZE must be a positive integer, got '{}'",
                        value
                    ))
                })?,
            Err(_) => DEFAULT_BATCH_SIZE,
        };

        info!(
            command = ?command,
            solr_url = %solr_url,
            include_related_dataset = include_related,
            dry_run = dry_run,
            batch_size = batch_size,
            "Initializing dependencies"
        );

        let config = IndexerConfig::load(config_path.as_deref())?;

        let provider = SolrProvider::new(&solr_url)
            .map_err(|e| IndexingError::config(format!("Failed to create Solr provider: {}", e)))?;

        let service = SearchIndexService::with_config(
            Box::new(provider),
            SearchIndexServiceConfig {
                batch_size,
                dry_run,
            },
        );

        let loader = if include_related {
            SearchLoader::with_related_tracking(service)
        } else {
            SearchLoader::new(service)
        };

        let orchestrator = Orchestrator::new(config, loader);

        Ok(Self {
            command,
            orchestrator,
        })
    }
}

fn required_path(name: &str) -> Result<PathBuf, IndexingError> {
    env::var(name)
        .map(PathBuf::from)
        .map_err(|_| IndexingError::config(format!("{} must be set", name)))
}

/// Read a boolean flag. Unset means false; unrecognized values are logged and
/// treated as false.
fn env_flag(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value).unwrap_or_else(|| {
            warn!(variable = name, value = %value, "Invalid boolean, defaulting to false");
            false
        }),
        Err(_) => false,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
