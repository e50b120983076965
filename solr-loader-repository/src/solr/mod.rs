//! Solr implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using the Solr HTTP API as the backend.

mod client;
pub mod queries;
pub mod responses;

pub use client::SolrClient;
