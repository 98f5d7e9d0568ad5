//! Orchestrator module for the metadata indexer.
//!
//! Drives metadata files through the processor and into the loader, one file
//! at a time.

use std::path::{Path, PathBuf};

use metadata_indexer_repository::SubmissionSummary;
use metadata_indexer_shared::FlattenedRecord;
use tracing::{debug, error, info, instrument, warn};

use crate::config::IndexerConfig;
use crate::errors::IngestError;
use crate::loader::{RelatedOutcome, SearchLoader};
use crate::processor::{build_document, flatten, flatten_bytes, identifier_of, missing_required};

/// Counts and outcomes of one indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Metadata files (or payloads) looked at.
    pub files_seen: usize,
    /// Inputs that could not be read or were not well-formed XML.
    pub parse_failures: usize,
    /// Records left out for missing required fields.
    pub skipped_records: usize,
    /// Documents built and handed to the loader.
    pub documents_built: usize,
    /// What the backend accepted.
    pub submitted: SubmissionSummary,
    pub related: RelatedOutcome,
}

#[derive(Debug, Default)]
struct RunCounters {
    files_seen: usize,
    parse_failures: usize,
    skipped_records: usize,
    documents_built: usize,
}

/// Orchestrator that coordinates the ingest components.
pub struct Orchestrator {
    config: IndexerConfig,
    loader: SearchLoader,
}

impl Orchestrator {
    pub fn new(config: IndexerConfig, loader: SearchLoader) -> Self {
        Self { config, loader }
    }

    /// Index every regular file of a directory.
    ///
    /// Files are processed in path order. A file that cannot be parsed or lacks
    /// a required field is logged and skipped; a backend failure aborts the run
    /// before the related-dataset pass.
    #[instrument(skip(self, directory), fields(directory = %directory.display()))]
    pub async fn index_directory(&mut self, directory: &Path) -> Result<RunSummary, IngestError> {
        let paths = list_files(directory).await?;
        info!(file_count = paths.len(), "Indexing metadata directory");

        let mut counters = RunCounters::default();
        for path in &paths {
            self.index_path(path, &mut counters).await?;
        }

        self.finish(counters).await
    }

    /// Index a single metadata file.
    #[instrument(skip(self, path), fields(file = %path.display()))]
    pub async fn index_file(&mut self, path: &Path) -> Result<RunSummary, IngestError> {
        let mut counters = RunCounters::default();
        self.index_path(path, &mut counters).await?;
        self.finish(counters).await
    }

    /// Index one in-memory metadata document.
    ///
    /// `fallback_id` identifies the document when it declares no identifier.
    #[instrument(skip(self, xml))]
    pub async fn index_single(
        &mut self,
        fallback_id: &str,
        xml: &str,
    ) -> Result<RunSummary, IngestError> {
        let mut counters = RunCounters {
            files_seen: 1,
            ..RunCounters::default()
        };
        let parsed = flatten(xml, &self.config.rules);
        self.process(fallback_id, parsed, &mut counters).await?;
        self.finish(counters).await
    }

    /// Delete every document of the target core.
    pub async fn clear(&self) -> Result<(), IngestError> {
        self.loader.clear().await
    }

    async fn index_path(
        &mut self,
        path: &Path,
        counters: &mut RunCounters,
    ) -> Result<(), IngestError> {
        counters.files_seen += 1;

        // Read raw bytes so the XML declaration decides the encoding.
        let xml = match tokio::fs::read(path).await {
            Ok(xml) => xml,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Failed to read metadata file");
                counters.parse_failures += 1;
                return Ok(());
            }
        };

        let parsed = flatten_bytes(&xml, &self.config.rules);
        self.process(&fallback_id(path), parsed, counters).await
    }

    async fn process(
        &mut self,
        fallback_id: &str,
        parsed: Result<FlattenedRecord, IngestError>,
        counters: &mut RunCounters,
    ) -> Result<(), IngestError> {
        let record = match parsed {
            Ok(record) => record,
            Err(e) => {
                error!(fallback_id = %fallback_id, error = %e, "Failed to parse metadata");
                counters.parse_failures += 1;
                return Ok(());
            }
        };

        let missing = missing_required(&record, &self.config.required_fields);
        if !missing.is_empty() {
            warn!(
                fallback_id = %fallback_id,
                missing = ?missing,
                required = ?self.config.required_fields,
                "Metadata is missing required fields, skipping"
            );
            counters.skipped_records += 1;
            return Ok(());
        }

        let id = identifier_of(&record, fallback_id);
        let document = build_document(&id, &record, self.loader.related_index_mut());
        debug!(document_id = %id, fields = record.len(), "Document built");

        counters.documents_built += 1;
        self.loader.load(document).await
    }

    async fn finish(&mut self, counters: RunCounters) -> Result<RunSummary, IngestError> {
        self.loader.flush().await?;
        let related = self.loader.flush_related().await?;

        let summary = RunSummary {
            files_seen: counters.files_seen,
            parse_failures: counters.parse_failures,
            skipped_records: counters.skipped_records,
            documents_built: counters.documents_built,
            submitted: self.loader.take_submitted(),
            related,
        };

        info!(
            files_seen = summary.files_seen,
            parse_failures = summary.parse_failures,
            skipped_records = summary.skipped_records,
            documents_indexed = summary.submitted.total,
            chunks_committed = summary.submitted.chunks_committed,
            dry_run = summary.submitted.dry_run,
            related = ?summary.related,
            "Indexing run complete"
        );

        Ok(summary)
    }
}

/// Regular files of `directory`, sorted by path.
async fn list_files(directory: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut entries = tokio::fs::read_dir(directory).await.map_err(|e| {
        IngestError::io(format!(
            "Failed to read directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        // Follows symlinks, so linked metadata files are indexed too.
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable directory entry");
            }
        }
    }
    paths.sort();

    Ok(paths)
}

/// File name without its extension.
fn fallback_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_id_strips_extension() {
        assert_eq!(fallback_id(Path::new("/data/mmd/abc-123.xml")), "abc-123");
        assert_eq!(fallback_id(Path::new("/data/mmd/abc-123")), "abc-123");
        assert_eq!(fallback_id(Path::new("/data/mmd/abc.v2.xml")), "abc.v2");
    }

    #[tokio::test]
    async fn test_list_files_is_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.xml", "a.xml", "b.xml"] {
            std::fs::write(dir.path().join(name), "<mmd/>").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let paths = list_files(dir.path()).await.unwrap();
        let names: Vec<String> = paths.iter().map(|p| fallback_id(p)).collect();

        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_files_follows_symlinks() {
        let store = tempfile::tempdir().unwrap();
        let target = store.path().join("stored.xml");
        std::fs::write(&target, "<mmd/>").unwrap();
        std::fs::create_dir(store.path().join("subdir")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xml"), "<mmd/>").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("b.xml")).unwrap();
        std::os::unix::fs::symlink(store.path().join("subdir"), dir.path().join("c")).unwrap();
        std::os::unix::fs::symlink(store.path().join("gone.xml"), dir.path().join("d.xml"))
            .unwrap();

        let paths = list_files(dir.path()).await.unwrap();
        let names: Vec<String> = paths.iter().map(|p| fallback_id(p)).collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_files_missing_directory() {
        let result = list_files(Path::new("/nonexistent/metadata")).await;
        assert!(matches!(result, Err(IngestError::IoError(_))));
    }
}
