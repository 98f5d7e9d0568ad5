//! Processor module for the metadata indexer.
//!
//! Turns XML metadata documents into flattened records and flattened records
//! into backend documents.

pub mod accessors;
mod composition;
mod document_builder;
mod flattener;

pub use accessors::{
    has_required, identifier_of, missing_required, related_datasets_of,
    METADATA_IDENTIFIER_FIELD, RELATED_DATASET_FIELD,
};
pub use composition::{CompositionRule, CompositionRules};
pub use document_builder::{build_document, BBOX_FIELD};
pub use flattener::{flatten, flatten_bytes};
