//! Configuration types for the Solr client and the SearchIndexClient.

use std::time::Duration;

/// Default Solr base URL, including the `/solr` context path.
pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr";

/// Default timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the Solr HTTP API.
#[derive(Debug, Clone)]
pub struct SolrConfig {
    /// Base URL of the Solr server (e.g. "http://localhost:8983/solr").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOLR_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SolrConfig {
    /// Create a config for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for the SearchIndexClient.
#[derive(Debug, Clone, Default)]
pub struct SearchIndexConfig {
    /// Maximum number of records allowed in a single add request.
    /// `None` submits the whole load in one request.
    pub max_batch_size: Option<usize>,
}

impl SearchIndexConfig {
    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}
