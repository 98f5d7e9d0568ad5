//! Record accessors.

use metadata_indexer_shared::FlattenedRecord;

/// Field holding the record's own declared identifier.
pub const METADATA_IDENTIFIER_FIELD: &str = "mmd_metadata_identifier";

/// Field referencing the parent dataset of a record.
pub const RELATED_DATASET_FIELD: &str = "mmd_related_dataset";

/// The record's declared identifier, or `fallback_id` when it declares none.
pub fn identifier_of(record: &FlattenedRecord, fallback_id: &str) -> String {
    record
        .first(METADATA_IDENTIFIER_FIELD)
        .unwrap_or(fallback_id)
        .to_string()
}

/// Required fields without a single entry in the record, in the order given.
pub fn missing_required<'a>(record: &FlattenedRecord, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|field| !record.contains_key(field))
        .map(String::as_str)
        .collect()
}

/// Whether every required field has at least one entry. Presence only; the
/// values themselves are not checked.
pub fn has_required(record: &FlattenedRecord, required: &[String]) -> bool {
    required.iter().all(|field| record.contains_key(field))
}

/// Every dataset this record declares itself related to, in document order.
pub fn related_datasets_of(record: &FlattenedRecord) -> impl Iterator<Item = &str> {
    record.values(RELATED_DATASET_FIELD)
}
