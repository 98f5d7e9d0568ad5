//! # Metadata Indexer Shared
//!
//! This crate defines the data structures passed between the metadata indexer
//! crates: the flattened record produced from an XML metadata file and the
//! document submitted to the search backend.

pub mod types;

pub use types::backend_document::{BackendDocument, FieldValue, ID_FIELD};
pub use types::flattened_record::FlattenedRecord;
