//! This module defines the core data structures shared across the metadata indexer.
//! It re-exports the record and document types.

pub mod backend_document;
pub mod flattened_record;

pub use backend_document::{BackendDocument, FieldValue};
pub use flattened_record::FlattenedRecord;
