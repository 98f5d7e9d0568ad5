//! Document builder.
//!
//! Maps a flattened record onto a backend document:
//!
//! - values that look like a calendar date (`YYYY-MM-DD`) are normalized to
//!   `YYYY-MM-DDT00:00:00Z`, and dropped when the date does not exist;
//! - the geographic extent rectangle is summarized into a `bbox` field;
//! - related-dataset references are optionally moved into a
//!   [`RelatedDatasetIndex`] instead of being indexed with the record.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use metadata_indexer_shared::{BackendDocument, FlattenedRecord};
use regex::Regex;
use tracing::{error, warn};

use crate::loader::RelatedDatasetIndex;
use crate::processor::accessors::{related_datasets_of, RELATED_DATASET_FIELD};

lazy_static! {
    static ref DATE_REGEXP: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Field receiving the synthesized bounding box.
pub const BBOX_FIELD: &str = "bbox";

pub const WEST_FIELD: &str = "mmd_geographic_extent_rectangle_west";
pub const EAST_FIELD: &str = "mmd_geographic_extent_rectangle_east";
pub const NORTH_FIELD: &str = "mmd_geographic_extent_rectangle_north";
pub const SOUTH_FIELD: &str = "mmd_geographic_extent_rectangle_south";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Default)]
struct Extent<'a> {
    west: Option<&'a str>,
    east: Option<&'a str>,
    north: Option<&'a str>,
    south: Option<&'a str>,
}

impl<'a> Extent<'a> {
    fn capture(&mut self, key: &str, value: &'a str) {
        let slot = match key {
            WEST_FIELD => &mut self.west,
            EAST_FIELD => &mut self.east,
            NORTH_FIELD => &mut self.north,
            SOUTH_FIELD => &mut self.south,
            _ => return,
        };
        *slot = Some(value);
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            (WEST_FIELD, self.west),
            (EAST_FIELD, self.east),
            (NORTH_FIELD, self.north),
            (SOUTH_FIELD, self.south),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field)
        .collect()
    }

    /// `ENVELOPE(minX, maxX, maxY, minY)`.
    fn envelope(&self) -> String {
        format!(
            "ENVELOPE({},{},{},{})",
            self.west.unwrap_or(""),
            self.east.unwrap_or(""),
            self.north.unwrap_or(""),
            self.south.unwrap_or("")
        )
    }
}

/// Normalize a `YYYY-MM-DD` value to a UTC midnight timestamp.
///
/// # Returns
///
/// * `None` - If the value is not shaped like a date
/// * `Some(Err(_))` - If it is shaped like a date that does not exist
/// * `Some(Ok(timestamp))` - The normalized timestamp
fn coerce_date(value: &str) -> Option<Result<String, chrono::ParseError>> {
    if !DATE_REGEXP.is_match(value) {
        return None;
    }
    Some(NaiveDate::parse_from_str(value, DATE_FORMAT).map(|date| {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }))
}

/// Build the backend document for a record.
///
/// With `related` set, every related-dataset reference is recorded as
/// `reference -> id` in the index and left out of the document. Without it,
/// references are indexed like any other field.
pub fn build_document(
    id: &str,
    record: &FlattenedRecord,
    related: Option<&mut RelatedDatasetIndex>,
) -> BackendDocument {
    let mut document = BackendDocument::new(id);
    let mut extent = Extent::default();
    let tracking = related.is_some();

    if let Some(index) = related {
        for reference in related_datasets_of(record) {
            index.record(reference, id);
        }
    }

    for (key, value) in record.iter() {
        extent.capture(key, value);

        if tracking && key == RELATED_DATASET_FIELD {
            continue;
        }

        match coerce_date(value) {
            None => document.add_field(key, value),
            Some(Ok(timestamp)) => document.add_field(key, timestamp),
            Some(Err(e)) => {
                error!(
                    document_id = %id,
                    field = %key,
                    value = %value,
                    error = %e,
                    "Invalid date, dropping field"
                );
            }
        }
    }

    let missing = extent.missing();
    if !missing.is_empty() {
        warn!(
            document_id = %id,
            missing = ?missing,
            "Incomplete geographic extent, bounding box is partial"
        );
    }
    document.add_field(BBOX_FIELD, extent.envelope());

    document
}
