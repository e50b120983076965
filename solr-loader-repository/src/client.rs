//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses this to load, query, count, facet, and delete documents.
//! Every mutating call is followed by a commit so its effect is visible to the
//! next query.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use solr_loader_shared::{FacetCount, Record, SearchQuery, SearchResponse};

/// The main client for interacting with the search index.
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    fn validate_collection(collection: &str) -> Result<(), SearchIndexError> {
        if collection.trim().is_empty() {
            return Err(SearchIndexError::validation("collection name is required"));
        }
        Ok(())
    }

    fn validate_field(field: &str) -> Result<(), SearchIndexError> {
        if field.trim().is_empty() {
            return Err(SearchIndexError::validation("field name is required"));
        }
        Ok(())
    }

    /// Add records to a collection in one request and commit.
    /// Input: collection name, records to add
    /// Output: Result<usize, SearchIndexError> (number of records submitted)
    ///
    /// An empty slice is a no-op and does not touch the server.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn index_records(
        &self,
        collection: &str,
        records: &[Record],
    ) -> Result<usize, SearchIndexError> {
        Self::validate_collection(collection)?;

        if records.is_empty() {
            return Ok(0);
        }

        self.validate_batch_size(records.len())?;

        self.provider.add_documents(collection, records).await?;
        self.provider.commit(collection).await?;

        info!(count = records.len(), "Records indexed and committed");
        Ok(records.len())
    }

    /// Delete a document by id and commit.
    /// Input: collection name, document id
    /// Output: Result<(), SearchIndexError>
    #[instrument(skip(self))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), SearchIndexError> {
        Self::validate_collection(collection)?;
        if id.trim().is_empty() {
            return Err(SearchIndexError::validation("document id is required"));
        }

        self.provider.delete_by_id(collection, id).await?;
        self.provider.commit(collection).await
    }

    /// Search a collection for `field:value`.
    /// Input: collection name, SearchQuery (field, value, rows)
    /// Output: Result<SearchResponse, SearchIndexError>
    pub async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError> {
        Self::validate_collection(collection)?;
        Self::validate_field(&query.field)?;

        self.provider.search(collection, query).await
    }

    /// Count all documents in a collection.
    pub async fn count(&self, collection: &str) -> Result<u64, SearchIndexError> {
        Self::validate_collection(collection)?;

        self.provider.count(collection).await
    }

    /// Value counts for every distinct value of `field`.
    pub async fn facet(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<FacetCount>, SearchIndexError> {
        Self::validate_collection(collection)?;
        Self::validate_field(field)?;

        self.provider.facet(collection, field).await
    }

    /// Commit pending changes on a collection.
    pub async fn commit(&self, collection: &str) -> Result<(), SearchIndexError> {
        Self::validate_collection(collection)?;

        self.provider.commit(collection).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use solr_loader_shared::FieldValue;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Collection {
        pending: Vec<Record>,
        pending_deletes: Vec<String>,
        committed: Vec<Record>,
    }

    /// In-memory provider with commit semantics: writes are only visible to
    /// queries after `commit`.
    #[derive(Default)]
    pub(crate) struct MockProvider {
        collections: Mutex<HashMap<String, Collection>>,
        pub(crate) commits: Mutex<Vec<String>>,
        pub(crate) should_fail: bool,
    }

    impl MockProvider {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        pub(crate) async fn create_collection(&self, name: &str) {
            self.collections
                .lock()
                .await
                .entry(name.to_string())
                .or_default();
        }

        fn field_matches(record: &Record, field: &str, value: &str) -> bool {
            record
                .get(field)
                .map(|v| v.to_string() == value)
                .unwrap_or(false)
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn collection_exists(&self, collection: &str) -> Result<bool, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::connection("Mock failure"));
            }
            Ok(self.collections.lock().await.contains_key(collection))
        }

        async fn add_documents(
            &self,
            collection: &str,
            records: &[Record],
        ) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::index("Mock failure"));
            }
            let mut collections = self.collections.lock().await;
            let entry = collections.entry(collection.to_string()).or_default();
            entry.pending.extend(records.iter().cloned());
            Ok(())
        }

        async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::delete("Mock failure"));
            }
            let mut collections = self.collections.lock().await;
            let entry = collections.entry(collection.to_string()).or_default();
            entry.pending_deletes.push(id.to_string());
            Ok(())
        }

        async fn commit(&self, collection: &str) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::commit("Mock failure"));
            }
            let mut collections = self.collections.lock().await;
            let entry = collections.entry(collection.to_string()).or_default();
            let pending: Vec<Record> = entry.pending.drain(..).collect();
            entry.committed.extend(pending);
            let deletes: Vec<String> = entry.pending_deletes.drain(..).collect();
            entry
                .committed
                .retain(|r| !deletes.iter().any(|id| Self::field_matches(r, "id", id)));
            self.commits.lock().await.push(collection.to_string());
            Ok(())
        }

        async fn search(
            &self,
            collection: &str,
            query: &SearchQuery,
        ) -> Result<SearchResponse, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::query("Mock failure"));
            }
            let collections = self.collections.lock().await;
            let matches: Vec<&Record> = collections
                .get(collection)
                .map(|c| {
                    c.committed
                        .iter()
                        .filter(|r| Self::field_matches(r, &query.field, &query.value))
                        .collect()
                })
                .unwrap_or_default();

            let docs = matches
                .iter()
                .take(query.rows as usize)
                .filter_map(|r| serde_json::to_value(r).ok())
                .filter_map(|v| v.as_object().cloned())
                .collect();

            Ok(SearchResponse {
                num_found: matches.len() as u64,
                docs,
            })
        }

        async fn count(&self, collection: &str) -> Result<u64, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::query("Mock failure"));
            }
            let collections = self.collections.lock().await;
            Ok(collections
                .get(collection)
                .map(|c| c.committed.len() as u64)
                .unwrap_or(0))
        }

        async fn facet(
            &self,
            collection: &str,
            field: &str,
        ) -> Result<Vec<FacetCount>, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::query("Mock failure"));
            }
            let collections = self.collections.lock().await;
            let mut counts: Vec<FacetCount> = Vec::new();
            if let Some(c) = collections.get(collection) {
                for value in c
                    .committed
                    .iter()
                    .filter_map(|r| r.get(field))
                    .filter(|v| !v.is_null())
                {
                    let value = value.to_string();
                    match counts.iter_mut().find(|f| f.value == value) {
                        Some(existing) => existing.count += 1,
                        None => counts.push(FacetCount::new(value, 1)),
                    }
                }
            }
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            Ok(counts)
        }
    }

    pub(crate) fn employee(id: &str, department: &str, gender: &str) -> Record {
        Record::new()
            .with("id", FieldValue::text(id))
            .with("Department", FieldValue::text(department))
            .with("Gender", FieldValue::text(gender))
    }

    fn sample_employees() -> Vec<Record> {
        vec![
            employee("E02001", "IT", "Male"),
            employee("E02002", "HR", "Female"),
            employee("E02003", "IT", "Female"),
            employee("E02004", "Sales", "Male"),
            employee("E02005", "IT", "Male"),
        ]
    }

    #[tokio::test]
    async fn test_index_records_commits() {
        let provider = Arc::new(MockProvider::new());
        let client = SearchIndexClient::new(provider.clone());

        let indexed = client
            .index_records("employees", &sample_employees())
            .await
            .unwrap();

        assert_eq!(indexed, 5);
        assert_eq!(client.count("employees").await.unwrap(), 5);
        assert_eq!(*provider.commits.lock().await, vec!["employees".to_string()]);
    }

    #[tokio::test]
    async fn test_index_empty_records_is_noop() {
        let provider = Arc::new(MockProvider::new());
        let client = SearchIndexClient::new(provider.clone());

        assert_eq!(client.index_records("employees", &[]).await.unwrap(), 0);
        assert!(provider.commits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_index_records_batch_size_exceeded() {
        let client = SearchIndexClient::with_config(
            Arc::new(MockProvider::new()),
            SearchIndexConfig::with_max_batch_size(2),
        );

        let result = client.index_records("employees", &sample_employees()).await;

        assert!(matches!(
            result,
            Err(SearchIndexError::BatchSizeExceeded { provided: 5, max: 2 })
        ));
    }

    #[tokio::test]
    async fn test_delete_reduces_count_by_one() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::new()));
        client
            .index_records("employees", &sample_employees())
            .await
            .unwrap();

        let before = client.count("employees").await.unwrap();
        client.delete("employees", "E02003").await.unwrap();
        let after = client.count("employees").await.unwrap();

        assert_eq!(before - after, 1);
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::new()));

        let result = client.delete("employees", " ").await;
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_search_by_field() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::new()));
        client
            .index_records("employees", &sample_employees())
            .await
            .unwrap();

        let response = client
            .search("employees", &SearchQuery::field("Department", "IT"))
            .await
            .unwrap();

        assert_eq!(response.num_found, 3);
        assert!(response.docs.iter().all(|d| d["Department"] == "IT"));
    }

    #[tokio::test]
    async fn test_facet_counts_distinct_values() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::new()));
        client
            .index_records("employees", &sample_employees())
            .await
            .unwrap();

        let facets = client.facet("employees", "Department").await.unwrap();

        assert_eq!(
            facets,
            vec![
                FacetCount::new("IT", 3),
                FacetCount::new("HR", 1),
                FacetCount::new("Sales", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::new()));

        assert!(matches!(
            client.count("").await,
            Err(SearchIndexError::ValidationError(_))
        ));
        assert!(matches!(
            client.facet("employees", "").await,
            Err(SearchIndexError::ValidationError(_))
        ));
        assert!(matches!(
            client
                .search("employees", &SearchQuery::field("", "IT"))
                .await,
            Err(SearchIndexError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let client = SearchIndexClient::new(Arc::new(MockProvider::failing()));

        let result = client.index_records("employees", &sample_employees()).await;
        assert!(matches!(result, Err(SearchIndexError::IndexError(_))));
    }
}
