//! CSV reader.
//!
//! Reads a delimited file with a header row into a [`Table`] of optional
//! string cells. Fields are decoded from raw bytes with a configurable
//! encoding so that legacy single-byte exports load without errors.

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::errors::IngestError;

/// Character encoding of the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvEncoding {
    /// ISO-8859-1: every byte is the code point of the same value.
    #[default]
    Latin1,
    /// UTF-8; invalid sequences are reported as decode errors.
    Utf8,
}

impl CsvEncoding {
    /// Decode one field.
    ///
    /// `row` is 1-based (the header is row 0) and `column` 0-based; both are
    /// only used for error reporting.
    pub fn decode(self, bytes: &[u8], row: usize, column: usize) -> Result<String, IngestError> {
        match self {
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| IngestError::decode(row, column, e.to_string())),
        }
    }
}

impl FromStr for CsvEncoding {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(IngestError::UnsupportedEncoding(other.to_string())),
        }
    }
}

/// Tabular data as read from the file.
///
/// Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Index of a column by header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ... so every column
/// keeps its own field.
///
/// A generated name that collides with an earlier header is bumped
/// again until it is unique.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header;
        let mut count = seen.get(&name).copied().unwrap_or(0);
        while count > 0 {
            seen.insert(name.clone(), count + 1);
            name = format!("{}.{}", name, count);
            count = seen.get(&name).copied().unwrap_or(0);
        }
        seen.insert(name.clone(), count + 1);
        result.push(name);
    }

    result
}

/// Read a CSV file from disk.
///
/// # Returns
///
/// * `Ok(Table)` - Headers and decoded rows
/// * `Err(IngestError::FileNotFound)` - If the path does not exist
/// * `Err(IngestError)` - On I/O, CSV structure or decode failures
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_csv_file(path: &Path, encoding: CsvEncoding) -> Result<Table, IngestError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IngestError::FileNotFound(path.to_path_buf()),
        _ => IngestError::IoError(e),
    })?;

    let table = read_csv(file, encoding)?;
    debug!(
        columns = table.headers.len(),
        rows = table.len(),
        "CSV file read"
    );
    Ok(table)
}

/// Read CSV data from any reader.
pub fn read_csv<R: Read>(source: R, encoding: CsvEncoding) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(column, bytes)| {
            encoding
                .decode(bytes, 0, column)
                .map(|h| h.trim().to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;
    let headers = dedupe_headers(headers);

    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(column, bytes)| {
                if bytes.is_empty() {
                    Ok(None)
                } else {
                    encoding.decode(bytes, index + 1, column).map(Some)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(Table { headers, rows })
}
