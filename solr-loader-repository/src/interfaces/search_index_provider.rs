//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (Solr over HTTP, in-memory
//! mocks for tests).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use solr_loader_shared::{FacetCount, Record, SearchQuery, SearchResponse};

/// Abstracts the underlying search server implementation.
///
/// This trait defines the interface for all search backend implementations. Implementations
/// are injected into `SearchIndexClient` and `CollectionProvisioner` to enable dependency
/// injection and easy testing with mock implementations.
///
/// Every operation targets a single named collection. Additions and deletions are not
/// visible to queries until `commit` has been called for that collection.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether a collection (core) exists on the server.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the server reports the collection
    /// * `Ok(false)` - If the server does not know the collection
    /// * `Err(SearchIndexError)` - If the status request fails
    async fn collection_exists(&self, collection: &str) -> Result<bool, SearchIndexError>;

    /// Submit documents to a collection in a single request.
    ///
    /// Documents with an `id` matching an existing document replace it.
    ///
    /// # Arguments
    ///
    /// * `collection` - Target collection name
    /// * `records` - Documents to add
    async fn add_documents(
        &self,
        collection: &str,
        records: &[Record],
    ) -> Result<(), SearchIndexError>;

    /// Delete a document by its unique identifier.
    ///
    /// Deleting an unknown identifier is not an error.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), SearchIndexError>;

    /// Make prior additions and deletions visible to queries.
    async fn commit(&self, collection: &str) -> Result<(), SearchIndexError>;

    /// Run a field search and return the matching page of documents.
    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError>;

    /// Count all documents in a collection.
    async fn count(&self, collection: &str) -> Result<u64, SearchIndexError>;

    /// Compute value counts for every distinct value of `field`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<FacetCount>)` - One entry per distinct value, in server order
    /// * `Err(SearchIndexError)` - If the query fails or the response has no facet for `field`
    async fn facet(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<FacetCount>, SearchIndexError>;
}
