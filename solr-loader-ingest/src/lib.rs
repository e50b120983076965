//! # Solr Loader Ingest
//!
//! This crate provides the ingest components for loading tabular CSV data
//! into a Solr collection.
//!
//! ## Architecture
//!
//! The ingest follows a Reader-Transform-Loader pattern:
//!
//! 1. **Reader**: Reads and decodes the CSV file
//! 2. **Transform**: Drops the excluded column, normalizes dates, types columns
//! 3. **Loader**: Submits records to the collection and commits

pub mod errors;
pub mod loader;
pub mod reader;
pub mod transform;

pub use errors::IngestError;
pub use loader::{CsvLoader, LoadSummary, LoaderConfig};
pub use reader::CsvEncoding;
