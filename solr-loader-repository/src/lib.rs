//! # Solr Loader Repository
//!
//! This crate provides traits and implementations for interacting with the
//! Solr search server. It includes definitions for errors, interfaces, a
//! concrete HTTP implementation for Solr, and collection provisioning via the
//! server's command-line tool.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod provisioner;
pub mod solr;

pub use client::SearchIndexClient;
pub use config::{SearchIndexConfig, SolrConfig};
pub use errors::{ProvisionError, SearchIndexError};
pub use interfaces::{CommandOutput, CommandRunner, SearchIndexProvider};
pub use provisioner::{CollectionProvisioner, ProcessRunner};
pub use solr::SolrClient;
