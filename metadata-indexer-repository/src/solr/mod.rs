//! Solr implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using the Solr JSON update API as the backend.

mod provider;

pub use provider::SolrProvider;
