//! Utility functions for the metadata indexer repository.

/// Core name suffix of level-2 (child) datasets.
pub const LEVEL_2_SUFFIX: &str = "l2";

/// Core name suffix of level-1 (parent) datasets.
pub const LEVEL_1_SUFFIX: &str = "l1";

/// Derive the level-1 core URL from a level-2 core URL.
///
/// Only the trailing suffix is rewritten; occurrences of `l2` elsewhere in the
/// URL (host names, path segments) are left untouched. A single trailing slash
/// is tolerated and dropped.
///
/// # Returns
///
/// * `Some(String)` - The sibling level-1 URL
/// * `None` - If the URL does not follow the level-2 naming convention
///
/// # Example
///
/// ```
/// use metadata_indexer_repository::sibling_level_url;
///
/// assert_eq!(
///     sibling_level_url("http://solr-l2.local:8983/solr/l2").as_deref(),
///     Some("http://solr-l2.local:8983/solr/l1"),
/// );
/// assert_eq!(sibling_level_url("http://localhost:8983/solr/l1"), None);
/// ```
pub fn sibling_level_url(base_url: &str) -> Option<String> {
    let trimmed = base_url.strip_suffix('/').unwrap_or(base_url);
    trimmed
        .strip_suffix(LEVEL_2_SUFFIX)
        .map(|prefix| format!("{}{}", prefix, LEVEL_1_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_level_url() {
        assert_eq!(
            sibling_level_url("http://localhost:8983/solr/metsis-l2").as_deref(),
            Some("http://localhost:8983/solr/metsis-l1")
        );
    }

    #[test]
    fn test_sibling_level_url_trailing_slash() {
        assert_eq!(
            sibling_level_url("http://localhost:8983/solr/l2/").as_deref(),
            Some("http://localhost:8983/solr/l1")
        );
    }

    #[test]
    fn test_sibling_level_url_only_rewrites_suffix() {
        assert_eq!(
            sibling_level_url("http://l2-host:8983/solr/l2").as_deref(),
            Some("http://l2-host:8983/solr/l1")
        );
    }

    #[test]
    fn test_sibling_level_url_mismatch() {
        assert_eq!(sibling_level_url("http://localhost:8983/solr/l1"), None);
        assert_eq!(sibling_level_url("http://localhost:8983/solr/l2core"), None);
        assert_eq!(sibling_level_url(""), None);
    }
}
