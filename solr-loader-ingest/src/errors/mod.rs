//! Error types for the Solr loader ingest.

use solr_loader_repository::SearchIndexError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading CSV data into the index.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The CSV file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Reading the CSV file failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV structure could not be parsed.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// A field could not be decoded with the configured encoding.
    #[error("Encoding error at row {row}, column {column}: {message}")]
    DecodeError {
        row: usize,
        column: usize,
        message: String,
    },

    /// The column to exclude is not present in the file.
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// Unsupported encoding name in configuration.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Error from the search index.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl IngestError {
    /// Create a CSV error.
    pub fn csv(msg: impl Into<String>) -> Self {
        Self::CsvError(msg.into())
    }

    /// Create a decode error for the given 1-based row and 0-based column.
    pub fn decode(row: usize, column: usize, msg: impl Into<String>) -> Self {
        Self::DecodeError {
            row,
            column,
            message: msg.into(),
        }
    }

    /// Create a missing column error.
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::CsvError(err.to_string())
    }
}
