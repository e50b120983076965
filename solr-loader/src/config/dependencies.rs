//! Dependency initialization and wiring for the Solr loader.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::AppError;
use solr_loader_ingest::{CsvLoader, LoaderConfig};
use solr_loader_repository::{
    CollectionProvisioner, CommandRunner, ProcessRunner, SearchIndexClient, SearchIndexConfig,
    SearchIndexProvider, SolrClient, SolrConfig,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Search, count, facet and delete operations.
    pub search: Arc<SearchIndexClient>,
    /// Collection creation.
    pub provisioner: CollectionProvisioner,
    /// CSV loading.
    pub loader: CsvLoader,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// No request is made here; an unreachable server surfaces on the first
    /// operation.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the Solr client cannot be created
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            solr_url = %settings.solr_url,
            solr_bin = %settings.solr_bin.display(),
            csv_path = %settings.csv_path.display(),
            "Initializing dependencies"
        );

        let solr_config = SolrConfig::new(settings.solr_url.clone()).with_timeout(settings.timeout);
        let provider = SolrClient::new(solr_config)
            .map_err(|e| AppError::config(format!("Failed to create Solr client: {}", e)))?;

        Ok(Self::with_components(
            settings,
            Arc::new(provider),
            Box::new(ProcessRunner::new()),
        ))
    }

    /// Wire dependencies around an existing provider and command runner.
    pub fn with_components(
        settings: &Settings,
        provider: Arc<dyn SearchIndexProvider>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let index_config = SearchIndexConfig {
            max_batch_size: settings.max_batch_size,
        };
        let search = Arc::new(SearchIndexClient::with_config(
            provider.clone(),
            index_config,
        ));

        let provisioner = CollectionProvisioner::new(provider, runner, settings.solr_bin.clone());

        let loader = CsvLoader::with_config(
            search.clone(),
            LoaderConfig {
                csv_path: settings.csv_path.clone(),
                encoding: settings.encoding,
                date_column: settings.date_column.clone(),
                date_format: settings.date_format.clone(),
                id_column: settings.id_column.clone(),
            },
        );

        Self {
            search,
            provisioner,
            loader,
        }
    }
}
