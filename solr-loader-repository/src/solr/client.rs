//! Solr client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! on top of the Solr HTTP API using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::SolrConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::solr::{queries, responses};
use solr_loader_shared::{FacetCount, Record, SearchQuery, SearchResponse};

/// Builds the error variant for a failed operation from a message.
type ErrorKind = fn(String) -> SearchIndexError;

/// Solr client implementation.
///
/// Talks to a standalone Solr server through its HTTP API: the core admin
/// endpoint for status checks, `/update` for additions, deletions and commits,
/// and `/select` for queries and facets.
///
/// # Example
///
/// ```ignore
/// let client = SolrClient::new(SolrConfig::new("http://localhost:8983/solr"))?;
/// let total = client.count("employees").await?;
/// ```
pub struct SolrClient {
    http: Client,
    base_url: String,
}

impl SolrClient {
    /// Create a new Solr client for the configured base URL.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(SolrClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(config: SolrConfig) -> Result<Self, SearchIndexError> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| SearchIndexError::connection(format!("Invalid Solr URL: {}", e)))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        info!(url = %base_url, timeout_secs = config.timeout.as_secs(), "Created Solr client");

        Ok(Self { http, base_url })
    }

    /// The normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn handler_url(&self, collection: &str, handler: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, handler)
    }

    fn cores_url(&self) -> String {
        format!("{}/admin/cores", self.base_url)
    }

    /// Map a transport failure, keeping connection problems distinct from
    /// operation failures.
    fn transport_error(e: reqwest::Error, kind: ErrorKind) -> SearchIndexError {
        if e.is_connect() || e.is_timeout() {
            SearchIndexError::connection(e.to_string())
        } else {
            kind(e.to_string())
        }
    }

    /// Check the response status and decode the JSON body.
    async fn read_json(response: Response, kind: ErrorKind) -> Result<Value, SearchIndexError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Solr request failed");
            return Err(kind(format!(
                "status {}: {}",
                status,
                responses::error_message(&body)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    async fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        kind: ErrorKind,
    ) -> Result<Value, SearchIndexError> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, kind))?;

        Self::read_json(response, kind).await
    }

    async fn post_update<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        body: &B,
        kind: ErrorKind,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .http
            .post(self.handler_url(collection, "update"))
            .query(&[("wt", "json")])
            .json(body)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, kind))?;

        Self::read_json(response, kind).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for SolrClient {
    #[instrument(skip(self))]
    async fn collection_exists(&self, collection: &str) -> Result<bool, SearchIndexError> {
        let body = self
            .get(
                &self.cores_url(),
                &queries::core_status_params(collection),
                SearchIndexError::QueryError,
            )
            .await?;

        let exists = responses::parse_core_status(&body, collection)?;
        debug!(exists, "Collection status checked");
        Ok(exists)
    }

    #[instrument(skip(self, records), fields(record_count = records.len()))]
    async fn add_documents(
        &self,
        collection: &str,
        records: &[Record],
    ) -> Result<(), SearchIndexError> {
        self.post_update(collection, records, SearchIndexError::IndexError)
            .await?;

        debug!("Documents submitted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), SearchIndexError> {
        self.post_update(
            collection,
            &queries::delete_by_id_body(id),
            SearchIndexError::DeleteError,
        )
        .await?;

        debug!("Delete submitted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn commit(&self, collection: &str) -> Result<(), SearchIndexError> {
        self.post_update(
            collection,
            &queries::commit_body(),
            SearchIndexError::CommitError,
        )
        .await?;

        debug!("Committed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError> {
        let body = self
            .get(
                &self.handler_url(collection, "select"),
                &queries::search_params(query),
                SearchIndexError::QueryError,
            )
            .await?;

        responses::parse_select(&body)
    }

    #[instrument(skip(self))]
    async fn count(&self, collection: &str) -> Result<u64, SearchIndexError> {
        let body = self
            .get(
                &self.handler_url(collection, "select"),
                &queries::count_params(),
                SearchIndexError::QueryError,
            )
            .await?;

        Ok(responses::parse_select(&body)?.num_found)
    }

    #[instrument(skip(self))]
    async fn facet(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<FacetCount>, SearchIndexError> {
        let body = self
            .get(
                &self.handler_url(collection, "select"),
                &queries::facet_params(field),
                SearchIndexError::QueryError,
            )
            .await?;

        responses::parse_facet(&body, field)
    }
}
