//! Error types for the Solr loader repository.

mod provision_error;
mod search_index_error;

pub use provision_error::ProvisionError;
pub use search_index_error::SearchIndexError;
