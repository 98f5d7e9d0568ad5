//! Composition rules.
//!
//! Some metadata blocks describe one resource with several sibling elements,
//! e.g.
//!
//! ```xml
//! <data_access>
//!   <type>HTTP</type>
//!   <description>Direct download</description>
//!   <resource>https://example.org/data.nc</resource>
//! </data_access>
//! ```
//!
//! A rule keyed by a dotted path suffix (`data_access.resource`) caches the text
//! of every matching element in its parent's sibling cache. When the rule has
//! `compose` set, the element's emitted value is replaced by
//! `"HTTP":"https://example.org/data.nc","description":"Direct download"`,
//! built from the cached siblings.

use std::collections::HashMap;

/// Sibling element holding the resource type.
const TYPE_SEGMENT: &str = "type";
/// Sibling element holding the resource location.
const RESOURCE_SEGMENT: &str = "resource";
/// Sibling element holding the resource description.
const DESCRIPTION_SEGMENT: &str = "description";

/// One configured rule, compiled from a dotted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRule {
    /// Underscore form of the dotted key (`data_access_resource`).
    suffix: String,
    /// Underscore form of the key without its last segment (`data_access`).
    prefix: String,
    compose: bool,
}

impl CompositionRule {
    /// Compile a rule from its dotted configuration key.
    pub fn new(dotted_key: &str, compose: bool) -> Self {
        let prefix = dotted_key
            .rsplit_once('.')
            .map(|(prefix, _)| prefix.replace('.', "_"))
            .unwrap_or_default();
        Self {
            suffix: dotted_key.replace('.', "_"),
            prefix,
            compose,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn compose(&self) -> bool {
        self.compose
    }

    /// Whether `path` ends with this rule's suffix on a segment boundary.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_suffix(self.suffix.as_str()) {
            Some(rest) => rest.is_empty() || rest.ends_with('_'),
            None => false,
        }
    }

    fn sibling_key(&self, segment: &str) -> String {
        if self.prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}_{}", self.prefix, segment)
        }
    }

    fn targets_description(&self) -> bool {
        self.suffix.ends_with(&format!("_{}", DESCRIPTION_SEGMENT)) || self.suffix == DESCRIPTION_SEGMENT
    }

    /// Build the compound value from the sibling cache.
    ///
    /// A description rule points at the cached resource; any other rule points
    /// at the element's own text. Missing siblings render as empty strings.
    pub fn compose_value(&self, sibling_cache: &HashMap<String, String>, own_text: &str) -> String {
        let lookup = |segment: &str| {
            sibling_cache
                .get(&self.sibling_key(segment))
                .map(String::as_str)
                .unwrap_or("")
        };

        let target = if self.targets_description() {
            lookup(RESOURCE_SEGMENT)
        } else {
            own_text
        };

        format!(
            "\"{}\":\"{}\",\"description\":\"{}\"",
            lookup(TYPE_SEGMENT),
            target,
            lookup(DESCRIPTION_SEGMENT)
        )
    }
}

/// Precompiled rule table, looked up by the closing element's local name.
///
/// Rules sharing a leaf name keep their declaration order.
#[derive(Debug, Clone, Default)]
pub struct CompositionRules {
    by_leaf: HashMap<String, Vec<CompositionRule>>,
    len: usize,
}

impl CompositionRules {
    /// A table without rules: every element emits its own text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `(dotted key, compose)` entries in declaration order.
    ///
    /// # Example
    ///
    /// ```
    /// use metadata_indexer::processor::CompositionRules;
    ///
    /// let rules = CompositionRules::from_entries([
    ///     ("data_access.type", false),
    ///     ("data_access.resource", true),
    /// ]);
    /// assert_eq!(rules.len(), 2);
    /// assert_eq!(rules.matching("resource", "mmd_data_access_resource").count(), 1);
    /// ```
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut rules = Self::new();
        for (key, compose) in entries {
            let key = key.as_ref();
            let leaf = key.rsplit('.').next().unwrap_or(key).to_string();
            rules
                .by_leaf
                .entry(leaf)
                .or_default()
                .push(CompositionRule::new(key, compose));
            rules.len += 1;
        }
        rules
    }

    /// Rules applying to the element named `local_name` at `path`.
    pub fn matching<'a>(
        &'a self,
        local_name: &str,
        path: &'a str,
    ) -> impl Iterator<Item = &'a CompositionRule> + 'a {
        self.by_leaf
            .get(local_name)
            .into_iter()
            .flatten()
            .filter(move |rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_rule_compiles_dotted_key() {
        let rule = CompositionRule::new("data_access.resource", true);
        assert_eq!(rule.suffix(), "data_access_resource");
        assert!(rule.compose());
    }

    #[test]
    fn test_rule_matches_on_segment_boundary() {
        let rule = CompositionRule::new("data_access.resource", true);
        assert!(rule.matches("mmd_data_access_resource"));
        assert!(rule.matches("data_access_resource"));
        assert!(!rule.matches("mmd_xdata_access_resource"));
        assert!(!rule.matches("mmd_data_access_resource_url"));
    }

    #[test]
    fn test_compose_resource() {
        let rule = CompositionRule::new("data_access.resource", true);
        let siblings = cache(&[
            ("data_access_type", "HTTP"),
            ("data_access_description", "Direct download"),
        ]);

        assert_eq!(
            rule.compose_value(&siblings, "https://example.org/data.nc"),
            r#""HTTP":"https://example.org/data.nc","description":"Direct download""#
        );
    }

    #[test]
    fn test_compose_description_points_at_resource() {
        let rule = CompositionRule::new("data_access.description", true);
        let siblings = cache(&[
            ("data_access_type", "OPeNDAP"),
            ("data_access_resource", "https://example.org/dods"),
            ("data_access_description", "Remote access"),
        ]);

        assert_eq!(
            rule.compose_value(&siblings, "Remote access"),
            r#""OPeNDAP":"https://example.org/dods","description":"Remote access""#
        );
    }

    #[test]
    fn test_compose_missing_siblings_render_empty() {
        let rule = CompositionRule::new("data_access.resource", true);
        assert_eq!(
            rule.compose_value(&HashMap::new(), "https://example.org"),
            r#""":"https://example.org","description":"""#
        );
    }

    #[test]
    fn test_table_lookup_by_leaf_keeps_declaration_order() {
        let rules = CompositionRules::from_entries([
            ("data_access.resource", true),
            ("related_information.resource", false),
            ("data_access.type", false),
        ]);

        let matched: Vec<&str> = rules
            .matching("resource", "mmd_data_access_resource")
            .map(CompositionRule::suffix)
            .collect();
        assert_eq!(matched, vec!["data_access_resource"]);

        assert_eq!(rules.matching("title", "mmd_title").count(), 0);
        assert_eq!(rules.len(), 3);
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let rules = CompositionRules::new();
        assert!(rules.is_empty());
        assert_eq!(rules.matching("resource", "mmd_resource").count(), 0);
    }
}
