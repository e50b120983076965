//! Query and response types for search operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Number of rows returned by a field search when none is requested.
pub const DEFAULT_ROWS: u32 = 10;

/// A field search against a single collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Field to match on.
    pub field: String,
    /// Value to match.
    pub value: String,
    /// Maximum number of documents to return.
    pub rows: u32,
    /// Pass the value through without query-syntax escaping.
    pub raw: bool,
}

impl SearchQuery {
    /// Create a query matching `field:value`.
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            rows: DEFAULT_ROWS,
            raw: false,
        }
    }

    /// Set the maximum number of rows to return.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    /// Send the value as-is, allowing wildcards and other query syntax.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// Documents returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching documents in the collection.
    pub num_found: u64,
    /// The returned page of documents.
    pub docs: Vec<Map<String, Value>>,
}

/// One bucket of a facet: a distinct field value and how many documents carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

impl FacetCount {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

impl fmt::Display for FacetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.count)
    }
}

/// Result of ensuring a collection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The collection was already present; nothing was done.
    AlreadyExists,
    /// The collection was created.
    Created,
}
