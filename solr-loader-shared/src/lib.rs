//! # Solr Loader Shared
//!
//! Shared types used across the Solr loader crates: the record model that
//! flows from the CSV loader into the index, and the query/response types
//! exchanged with the search repository.

mod record;
mod search;

pub use record::{FieldValue, Record};
pub use search::{FacetCount, ProvisionOutcome, SearchQuery, SearchResponse, DEFAULT_ROWS};
