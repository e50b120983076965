//! Runtime settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::AppError;
use solr_loader_ingest::loader::{DEFAULT_CSV_PATH, DEFAULT_DATE_COLUMN, DEFAULT_DATE_FORMAT};
use solr_loader_ingest::CsvEncoding;
use solr_loader_repository::config::DEFAULT_SOLR_URL;
use solr_loader_repository::provisioner::DEFAULT_SOLR_BIN;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// All settings needed to build the dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Solr base URL including the context path.
    pub solr_url: String,
    /// Path of the Solr command-line tool used to create collections.
    pub solr_bin: PathBuf,
    /// CSV file to load.
    pub csv_path: PathBuf,
    /// Encoding of the CSV file.
    pub encoding: CsvEncoding,
    /// Column normalized to a timestamp.
    pub date_column: String,
    /// Input format of the date column.
    pub date_format: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Optional cap on the number of records per add request.
    pub max_batch_size: Option<usize>,
    /// Column copied into the `id` field when the file has no `id` of its own.
    pub id_column: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solr_url: DEFAULT_SOLR_URL.to_string(),
            solr_bin: PathBuf::from(DEFAULT_SOLR_BIN),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            encoding: CsvEncoding::default(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_batch_size: None,
            id_column: None,
        }
    }
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_URL`: Solr base URL (default: http://localhost:8983/solr)
    /// - `SOLR_BIN`: Solr command-line tool (default: solr)
    /// - `CSV_PATH`: CSV file to load (default: employee_data.csv)
    /// - `CSV_ENCODING`: latin1 or utf8 (default: latin1)
    /// - `DATE_COLUMN`: Column normalized to a timestamp (default: Hire_Date)
    /// - `DATE_FORMAT`: Input format of the date column (default: %m/%d/%Y)
    /// - `SOLR_TIMEOUT_SECS`: HTTP request timeout (default: 30)
    /// - `MAX_BATCH_SIZE`: Maximum records per add request (default: unlimited)
    /// - `ID_COLUMN`: Column copied into `id` before loading (default: none)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("SOLR_URL") {
            settings.solr_url = url;
        }
        if let Some(bin) = lookup("SOLR_BIN") {
            settings.solr_bin = PathBuf::from(bin);
        }
        if let Some(path) = lookup("CSV_PATH") {
            settings.csv_path = PathBuf::from(path);
        }
        if let Some(encoding) = lookup("CSV_ENCODING") {
            settings.encoding = encoding
                .parse()
                .map_err(|e| AppError::config(format!("CSV_ENCODING: {}", e)))?;
        }
        if let Some(column) = lookup("DATE_COLUMN") {
            settings.date_column = column;
        }
        if let Some(format) = lookup("DATE_FORMAT") {
            settings.date_format = format;
        }
        if let Some(secs) = lookup("SOLR_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| AppError::config(format!("SOLR_TIMEOUT_SECS: {}", e)))?;
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = lookup("MAX_BATCH_SIZE") {
            let max: usize = max
                .parse()
                .map_err(|e| AppError::config(format!("MAX_BATCH_SIZE: {}", e)))?;
            settings.max_batch_size = Some(max);
        }
        if let Some(column) = lookup("ID_COLUMN") {
            settings.id_column = Some(column);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.solr_url, "http://localhost:8983/solr");
        assert_eq!(settings.csv_path, PathBuf::from("employee_data.csv"));
        assert_eq!(settings.encoding, CsvEncoding::Latin1);
        assert_eq!(settings.date_column, "Hire_Date");
        assert!(settings.max_batch_size.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("SOLR_URL", "http://solr.internal:8983/solr"),
            ("SOLR_BIN", "/opt/solr-9.7.0/bin/solr"),
            ("CSV_ENCODING", "utf-8"),
            ("SOLR_TIMEOUT_SECS", "5"),
            ("MAX_BATCH_SIZE", "500"),
            ("ID_COLUMN", "Employee_ID"),
        ]))
        .unwrap();

        assert_eq!(settings.solr_url, "http://solr.internal:8983/solr");
        assert_eq!(settings.solr_bin, PathBuf::from("/opt/solr-9.7.0/bin/solr"));
        assert_eq!(settings.encoding, CsvEncoding::Utf8);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_batch_size, Some(500));
        assert_eq!(settings.id_column.as_deref(), Some("Employee_ID"));
    }

    #[test]
    fn test_invalid_values() {
        let err = Settings::from_lookup(lookup_from(&[("SOLR_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Settings::from_lookup(lookup_from(&[("CSV_ENCODING", "cp037")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
