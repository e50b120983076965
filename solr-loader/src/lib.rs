//! # Solr Loader
//!
//! Main library for the Solr loader command-line tool.
//!
//! This crate provides configuration, dependency wiring and the task
//! functions behind each command: collection provisioning, CSV loading,
//! field search, document count, delete by id and facet counts.

pub mod config;
pub mod tasks;

pub use config::{Dependencies, Settings};
pub use tasks::DriverPlan;

use solr_loader_ingest::IngestError;
use solr_loader_repository::{ProvisionError, SearchIndexError};
use thiserror::Error;

/// Errors that can occur while configuring or running a command.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// Provisioning error.
    #[error("Provision error: {0}")]
    ProvisionError(#[from] ProvisionError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
