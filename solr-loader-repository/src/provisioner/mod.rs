//! Collection provisioning.
//!
//! Ensures a collection exists on the server: the core admin status endpoint
//! is checked first and the server's command-line tool is only invoked when the
//! collection is missing.

mod process;

pub use process::ProcessRunner;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::errors::ProvisionError;
use crate::interfaces::{CommandRunner, SearchIndexProvider};
use solr_loader_shared::ProvisionOutcome;

/// Default name of the Solr command-line tool, resolved through `PATH`.
pub const DEFAULT_SOLR_BIN: &str = "solr";

/// Creates collections that do not exist yet.
pub struct CollectionProvisioner {
    provider: Arc<dyn SearchIndexProvider>,
    runner: Box<dyn CommandRunner>,
    solr_bin: PathBuf,
}

impl CollectionProvisioner {
    /// Create a provisioner that runs `solr_bin` through `runner`.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        runner: Box<dyn CommandRunner>,
        solr_bin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            runner,
            solr_bin: solr_bin.into(),
        }
    }

    /// Arguments passed to the command-line tool to create `collection`.
    fn create_args(collection: &str) -> Vec<String> {
        vec![
            "create".to_string(),
            "-c".to_string(),
            collection.to_string(),
        ]
    }

    /// Ensure `collection` exists, creating it if the server does not report it.
    ///
    /// Calling this for an existing collection never runs the create command.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionOutcome::AlreadyExists)` - The collection was already present
    /// * `Ok(ProvisionOutcome::Created)` - The create command succeeded
    /// * `Err(ProvisionError)` - Validation, status check or command failure
    #[instrument(skip(self))]
    pub async fn ensure_collection(
        &self,
        collection: &str,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        if collection.trim().is_empty() {
            return Err(ProvisionError::validation("collection name is required"));
        }

        if self.provider.collection_exists(collection).await? {
            info!("Collection already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        let args = Self::create_args(collection);
        info!(solr_bin = %self.solr_bin.display(), "Creating collection");

        let output = self.runner.run(&self.solr_bin, &args).await?;
        if !output.success {
            warn!(
                status = %output.status_description(),
                stderr = %output.stderr.trim(),
                "Collection create command failed"
            );
            return Err(ProvisionError::command_failed(
                output.status_description(),
                output.stderr.trim(),
            ));
        }

        info!("Collection created");
        Ok(ProvisionOutcome::Created)
    }
}
