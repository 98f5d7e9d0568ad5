//! Rule configuration for the metadata indexer.
//!
//! A JSON document listing the fields every record must carry and the
//! composition rules applied while flattening:
//!
//! ```json
//! {
//!   "required_fields": ["mmd_metadata_identifier", "mmd_title"],
//!   "enrichment_required_fields": ["mmd_data_access_resource"],
//!   "composition_rules": {
//!     "data_access.type": false,
//!     "data_access.resource": true
//!   }
//! }
//! ```
//!
//! Rules keep the order in which they are declared. A default configuration is
//! compiled into the binary and can be replaced with a file of the same shape.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::processor::CompositionRules;
use crate::IndexingError;

const DEFAULT_CONFIG: &str = include_str!("../../config/default.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexerConfigFile {
    #[serde(default)]
    required_fields: Vec<String>,
    #[serde(default)]
    enrichment_required_fields: Vec<String>,
    #[serde(default)]
    composition_rules: Map<String, Value>,
}

/// Compiled rule configuration, shared read-only by every flatten call.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub required_fields: Vec<String>,
    /// Fields a record needs before thumbnail or feature-type enrichers may
    /// derive documents from it. Primary indexing does not check them.
    pub enrichment_required_fields: Vec<String>,
    pub rules: CompositionRules,
}

impl IndexerConfig {
    /// The configuration compiled into the binary.
    pub fn embedded() -> Result<Self, IndexingError> {
        Self::from_json(DEFAULT_CONFIG)
    }

    /// Parse and compile a JSON configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexerConfig)` - The compiled configuration
    /// * `Err(IndexingError::ConfigError)` - If the JSON is malformed, has unknown
    ///   keys or a rule value that is not a boolean
    pub fn from_json(json: &str) -> Result<Self, IndexingError> {
        let file: IndexerConfigFile = serde_json::from_str(json)
            .map_err(|e| IndexingError::config(format!("Invalid indexer configuration: {}", e)))?;

        let mut entries = Vec::with_capacity(file.composition_rules.len());
        for (key, value) in file.composition_rules {
            let compose = value.as_bool().ok_or_else(|| {
                IndexingError::config(format!(
                    "Composition rule '{}' must be a boolean, found {}",
                    key, value
                ))
            })?;
            entries.push((key, compose));
        }

        Ok(Self {
            required_fields: file.required_fields,
            enrichment_required_fields: file.enrichment_required_fields,
            rules: CompositionRules::from_entries(entries),
        })
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, IndexingError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            IndexingError::config(format!(
                "Failed to read indexer configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// The file at `path` when given, the embedded configuration otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, IndexingError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };

        info!(
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
            required_fields = ?config.required_fields,
            enrichment_required_fields = ?config.enrichment_required_fields,
            composition_rules = config.rules.len(),
            "Indexer configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_is_valid() {
        let config = IndexerConfig::embedded().unwrap();

        assert!(config
            .required_fields
            .contains(&"mmd_metadata_identifier".to_string()));
        assert_eq!(
            config
                .rules
                .matching("resource", "mmd_data_access_resource")
                .filter(|rule| rule.compose())
                .count(),
            1
        );
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        let config = IndexerConfig::from_json(
            r#"{
                "required_fields": ["mmd_title"],
                "composition_rules": {
                    "data_access.resource": true,
                    "resource": false
                }
            }"#,
        )
        .unwrap();

        let matched: Vec<&str> = config
            .rules
            .matching("resource", "mmd_data_access_resource")
            .map(|rule| rule.suffix())
            .collect();
        assert_eq!(matched, vec!["data_access_resource", "resource"]);
        assert_eq!(config.required_fields, vec!["mmd_title".to_string()]);
    }

    #[test]
    fn test_enrichment_fields_are_loaded_apart_from_primary_fields() {
        let config = IndexerConfig::from_json(
            r#"{
                "required_fields": ["mmd_title"],
                "enrichment_required_fields": ["mmd_data_access_resource"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.required_fields, vec!["mmd_title".to_string()]);
        assert_eq!(
            config.enrichment_required_fields,
            vec!["mmd_data_access_resource".to_string()]
        );
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config = IndexerConfig::from_json("{}").unwrap();
        assert!(config.required_fields.is_empty());
        assert!(config.enrichment_required_fields.is_empty());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_non_boolean_rule_is_rejected() {
        let result = IndexerConfig::from_json(r#"{"composition_rules": {"data_access.resource": "yes"}}"#);
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = IndexerConfig::from_json(r#"{"requiredFields": []}"#);
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"required_fields": ["mmd_abstract"]}}"#).unwrap();

        let config = IndexerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.required_fields, vec!["mmd_abstract".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = IndexerConfig::load(Some(Path::new("/nonexistent/indexer.json")));
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
