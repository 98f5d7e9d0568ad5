//! Metadata Indexer Main Entry Point
//!
//! Indexes a directory or a single file of dataset metadata into Solr, or
//! clears the target core, as selected by `INDEXER_COMMAND`.

use dotenv::dotenv;
use metadata_indexer::{Dependencies, IndexerCommand, IndexingError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("metadata_indexer=info,metadata_indexer_repository=info")
    });

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "metadata-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "metadata-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting metadata indexer");

    let Dependencies {
        command,
        mut orchestrator,
    } = match Dependencies::new() {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let result = match &command {
        IndexerCommand::IndexMetadata { source_directory } => orchestrator
            .index_directory(source_directory)
            .await
            .map(|_| ()),
        IndexerCommand::IndexSingleMetadata { metadata_file } => {
            orchestrator.index_file(metadata_file).await.map(|_| ())
        }
        IndexerCommand::Clear => orchestrator.clear().await,
    };

    match result {
        Ok(()) => {
            info!(command = ?command, "Metadata indexer completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(command = ?command, error = %e, "Metadata indexer failed");
            Err(e.into())
        }
    }
}
