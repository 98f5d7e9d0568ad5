//! Backend document types for the search index.
//!
//! This module defines the document structure submitted to the search backend.
//! A document is an identifier plus a set of named fields. Fields either carry
//! plain values (one or many) or an atomic "set" modification that replaces the
//! stored collection of an already indexed document.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Name of the mandatory identifier field.
pub const ID_FIELD: &str = "id";

/// Value of a single document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain field values. A single value is serialized as a string, several
    /// values as an array.
    Values(Vec<String>),
    /// Atomic update replacing the whole stored collection of the field.
    ///
    /// Serialized as `{"set": [...]}`.
    Set(Vec<String>),
}

impl FieldValue {
    /// Values carried by this field, regardless of the modifier.
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Values(values) | FieldValue::Set(values) => values,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Values(values) if values.len() == 1 => serializer.serialize_str(&values[0]),
            FieldValue::Values(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            FieldValue::Set(values) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("set", values)?;
                map.end()
            }
        }
    }
}

/// Document representation for the search backend.
///
/// # Example
///
/// ```
/// use metadata_indexer_shared::BackendDocument;
///
/// let mut doc = BackendDocument::new("dataset-1");
/// doc.add_field("mmd_keywords_keyword", "sea ice");
/// doc.add_field("mmd_keywords_keyword", "arctic");
///
/// assert_eq!(doc.id(), "dataset-1");
/// assert_eq!(doc.values("mmd_keywords_keyword"), ["sea ice", "arctic"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDocument {
    id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl BackendDocument {
    /// Create a document carrying only its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a value to a field, turning it multi-valued if it already holds values.
    ///
    /// Appending to a field that carries a "set" modification extends the
    /// replacement collection.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.fields.entry(name.into()) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(FieldValue::Values(vec![value]));
            }
            std::collections::btree_map::Entry::Occupied(mut entry) => match entry.get_mut() {
                FieldValue::Values(values) | FieldValue::Set(values) => values.push(value),
            },
        }
    }

    /// Replace a field with an atomic "set" modification.
    pub fn set_field<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            name.into(),
            FieldValue::Set(values.into_iter().map(Into::into).collect()),
        );
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Values of a field, or an empty slice when the field is absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(FieldValue::values).unwrap_or(&[])
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over fields in name order. The identifier is not included.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for BackendDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (name, value) in &self.fields {
            // The identifier always comes from `id`; a record field of the same
            // name must not produce a duplicate key.
            if name != ID_FIELD {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
