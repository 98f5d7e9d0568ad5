//! Flattened metadata record.
//!
//! A record is the path-keyed view of one XML metadata file. Keys are the
//! underscore-joined element paths (for example `mmd_data_access_resource`) and
//! may repeat: every occurrence of a repeated element produces its own entry, in
//! the order it was encountered in the source document.

use serde::{Deserialize, Serialize};

/// Ordered multimap from element path to text value.
///
/// # Example
///
/// ```
/// use metadata_indexer_shared::FlattenedRecord;
///
/// let mut record = FlattenedRecord::new();
/// record.push("mmd_keywords_keyword", "sea ice");
/// record.push("mmd_keywords_keyword", "arctic");
///
/// let keywords: Vec<&str> = record.values("mmd_keywords_keyword").collect();
/// assert_eq!(keywords, vec!["sea ice", "arctic"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRecord {
    entries: Vec<(String, String)>,
}

impl FlattenedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any values already stored there.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// All values stored under `key`, in encounter order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The first value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether at least one value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterate over every `(key, value)` entry in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries, counting repeated keys individually.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlattenedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
