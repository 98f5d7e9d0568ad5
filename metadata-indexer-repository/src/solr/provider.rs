//! Solr provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! on top of the Solr JSON update handler, using `reqwest` as the HTTP client.

use async_trait::async_trait;
use metadata_indexer_shared::BackendDocument;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;

/// Header returned by every Solr update request when `wt=json` is requested.
#[derive(Debug, Deserialize)]
struct ResponseHeader {
    status: i64,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(rename = "responseHeader")]
    response_header: ResponseHeader,
}

/// Which update call produced a response, used to pick the error kind.
#[derive(Debug, Clone, Copy)]
enum UpdateCall {
    Add,
    Commit,
    Delete,
}

impl UpdateCall {
    fn error(self, msg: String) -> SearchIndexError {
        match self {
            UpdateCall::Add => SearchIndexError::add(msg),
            UpdateCall::Commit => SearchIndexError::commit(msg),
            UpdateCall::Delete => SearchIndexError::delete(msg),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            UpdateCall::Add => "add",
            UpdateCall::Commit => "commit",
            UpdateCall::Delete => "delete",
        }
    }
}

/// Solr provider implementation.
///
/// Targets a single core, e.g. `http://localhost:8983/solr/l2`.
///
/// # Example
///
/// ```ignore
/// use metadata_indexer_repository::{SearchIndexProvider, SolrProvider};
/// use metadata_indexer_shared::BackendDocument;
///
/// let provider = SolrProvider::new("http://localhost:8983/solr/l2")?;
/// provider.add(&[BackendDocument::new("dataset-1")]).await?;
/// provider.commit().await?;
/// ```
pub struct SolrProvider {
    client: Client,
    base_url: Url,
}

impl SolrProvider {
    /// Create a new Solr provider for the core at `url`.
    ///
    /// # Returns
    ///
    /// * `Ok(SolrProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let base_url = Self::parse_base_url(url)?;
        let client = Client::builder().no_proxy().build()?;

        info!(url = %base_url, "Created Solr provider");

        Ok(Self { client, base_url })
    }

    fn parse_base_url(url: &str) -> Result<Url, SearchIndexError> {
        let parsed = Url::parse(url)?;
        if parsed.cannot_be_a_base() {
            return Err(SearchIndexError::validation(format!(
                "Base URL '{}' cannot carry a path",
                url
            )));
        }
        Ok(parsed)
    }

    /// The update handler of the targeted core.
    ///
    /// Built by appending a path segment, so a core name at the end of the base
    /// URL is kept (`.../solr/l2` becomes `.../solr/l2/update`).
    fn update_url(&self) -> String {
        format!("{}/update", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Post a JSON body to the update handler and check the Solr response.
    async fn post_update(
        &self,
        call: UpdateCall,
        body: &serde_json::Value,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .post(self.update_url())
            .query(&[("wt", "json")])
            .json(body)
            .send()
            .await
            .map_err(|e| call.error(e.to_string()))?;

        Self::check_response(call, response).await
    }

    async fn check_response(call: UpdateCall, response: Response) -> Result<(), SearchIndexError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(status = %status, body = %body, call = call.as_str(), "Solr update request failed");
            return Err(call.error(format!(
                "{} failed with status {}: {}",
                call.as_str(),
                status,
                body
            )));
        }

        let parsed: UpdateResponse =
            serde_json::from_str(&body).map_err(|e| SearchIndexError::parse(e.to_string()))?;
        if parsed.response_header.status != 0 {
            return Err(call.error(format!(
                "{} returned Solr status {}",
                call.as_str(),
                parsed.response_header.status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for SolrProvider {
    async fn add(&self, documents: &[BackendDocument]) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(documents)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
        self.post_update(UpdateCall::Add, &body).await?;

        debug!(count = documents.len(), core = %self.base_url, "Documents added");
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.post_update(UpdateCall::Commit, &json!({ "commit": {} }))
            .await?;

        debug!(core = %self.base_url, "Changes committed");
        Ok(())
    }

    async fn delete_by_query(&self, query: &str) -> Result<(), SearchIndexError> {
        self.post_update(UpdateCall::Delete, &json!({ "delete": { "query": query } }))
            .await?;

        debug!(core = %self.base_url, query = %query, "Documents deleted by query");
        Ok(())
    }

    fn base_url(&self) -> String {
        self.base_url.to_string()
    }

    fn set_base_url(&mut self, url: &str) -> Result<(), SearchIndexError> {
        self.base_url = Self::parse_base_url(url)?;
        info!(url = %self.base_url, "Solr provider re-targeted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_url_keeps_core_name() {
        let provider = SolrProvider::new("http://localhost:8983/solr/l2").unwrap();
        assert_eq!(provider.update_url(), "http://localhost:8983/solr/l2/update");
    }

    #[test]
    fn test_update_url_with_trailing_slash() {
        let provider = SolrProvider::new("http://localhost:8983/solr/l2/").unwrap();
        assert_eq!(provider.update_url(), "http://localhost:8983/solr/l2/update");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = SolrProvider::new("not a url");
        assert!(matches!(
            result.err(),
            Some(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_new_rejects_url_without_path() {
        let result = SolrProvider::new("mailto:solr@example.org");
        assert!(matches!(
            result.err(),
            Some(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_set_base_url() {
        let mut provider = SolrProvider::new("http://localhost:8983/solr/l2").unwrap();
        provider
            .set_base_url("http://localhost:8983/solr/l1")
            .unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8983/solr/l1");
        assert_eq!(provider.update_url(), "http://localhost:8983/solr/l1/update");
    }

    #[test]
    fn test_set_base_url_invalid_keeps_previous_target() {
        let mut provider = SolrProvider::new("http://localhost:8983/solr/l2").unwrap();
        assert!(provider.set_base_url("::").is_err());
        assert_eq!(provider.base_url(), "http://localhost:8983/solr/l2");
    }

    #[test]
    fn test_update_response_parsing() {
        let parsed: UpdateResponse =
            serde_json::from_str(r#"{"responseHeader":{"status":0,"QTime":3}}"#).unwrap();
        assert_eq!(parsed.response_header.status, 0);
    }

    #[tokio::test]
    async fn test_add_empty_batch_is_noop() {
        // No request is sent for an empty batch, so an unreachable core is fine.
        let provider = SolrProvider::new("http://127.0.0.1:1/solr/l2").unwrap();
        assert!(provider.add(&[]).await.is_ok());
    }
}
