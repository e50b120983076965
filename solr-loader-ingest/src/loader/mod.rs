//! Loader module for the Solr loader ingest.
//!
//! Reads the CSV file, applies the column transformations and submits the
//! resulting records to a collection in one request followed by a commit.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::errors::IngestError;
use crate::reader::{read_csv_file, CsvEncoding};
use crate::transform::{copy_id_column, drop_column, into_records, normalize_date_column};
use solr_loader_repository::SearchIndexClient;
use solr_loader_shared::Record;

/// Default path of the source CSV file.
pub const DEFAULT_CSV_PATH: &str = "employee_data.csv";

/// Default name of the column normalized to a timestamp.
pub const DEFAULT_DATE_COLUMN: &str = "Hire_Date";

/// Default input format of the date column.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Configuration for the CSV loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Path of the CSV file to load.
    pub csv_path: PathBuf,
    /// Character encoding of the file.
    pub encoding: CsvEncoding,
    /// Column rewritten as an ISO-8601 UTC timestamp, if present.
    pub date_column: String,
    /// chrono format string used to parse the date column.
    pub date_format: String,
    /// Column copied into the `id` field before the excluded column is dropped.
    pub id_column: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            encoding: CsvEncoding::default(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            id_column: None,
        }
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub collection: String,
    pub excluded_column: String,
    /// Number of records submitted.
    pub records: usize,
    /// Number of date cells that could not be parsed and were nulled.
    pub unparseable_dates: usize,
}

/// Loads CSV data into a collection.
pub struct CsvLoader {
    client: Arc<SearchIndexClient>,
    config: LoaderConfig,
}

impl CsvLoader {
    /// Create a new loader with default configuration.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self {
            client,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<SearchIndexClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// The loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read and transform the CSV file without submitting anything.
    ///
    /// # Returns
    ///
    /// * `Ok((records, unparseable_dates))` - Records lacking `exclude_column`
    /// * `Err(IngestError)` - Missing file, decode failure or unknown column
    pub fn prepare_records(
        &self,
        exclude_column: &str,
    ) -> Result<(Vec<Record>, usize), IngestError> {
        let mut table = read_csv_file(&self.config.csv_path, self.config.encoding)?;
        if table.is_empty() {
            warn!(path = %self.config.csv_path.display(), "CSV file has no data rows");
        }

        if let Some(id_column) = &self.config.id_column {
            copy_id_column(&mut table, id_column)?;
        }
        drop_column(&mut table, exclude_column)?;
        let unparseable = normalize_date_column(
            &mut table,
            &self.config.date_column,
            &self.config.date_format,
        );

        Ok((into_records(&table), unparseable))
    }

    /// Load the CSV file into `collection`, excluding one column.
    ///
    /// All records are submitted in a single request and then committed.
    #[instrument(skip(self), fields(path = %self.config.csv_path.display()))]
    pub async fn load(
        &self,
        collection: &str,
        exclude_column: &str,
    ) -> Result<LoadSummary, IngestError> {
        let (records, unparseable_dates) = self.prepare_records(exclude_column)?;

        let submitted = self.client.index_records(collection, &records).await?;

        info!(records = submitted, "CSV data indexed");

        Ok(LoadSummary {
            collection: collection.to_string(),
            excluded_column: exclude_column.to_string(),
            records: submitted,
            unparseable_dates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solr_loader_repository::{SearchIndexError, SearchIndexProvider};
    use solr_loader_shared::{FacetCount, FieldValue, SearchQuery, SearchResponse};
    use std::io::Write;
    use tokio::sync::Mutex;

    /// Captures submitted records and commits.
    #[derive(Default)]
    struct RecordingProvider {
        added: Mutex<Vec<(String, Vec<Record>)>>,
        commits: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchIndexProvider for RecordingProvider {
        async fn collection_exists(&self, _collection: &str) -> Result<bool, SearchIndexError> {
            Ok(true)
        }

        async fn add_documents(
            &self,
            collection: &str,
            records: &[Record],
        ) -> Result<(), SearchIndexError> {
            self.added
                .lock()
                .await
                .push((collection.to_string(), records.to_vec()));
            Ok(())
        }

        async fn delete_by_id(&self, _collection: &str, _id: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn commit(&self, collection: &str) -> Result<(), SearchIndexError> {
            self.commits.lock().await.push(collection.to_string());
            Ok(())
        }

        async fn search(
            &self,
            _collection: &str,
            _query: &SearchQuery,
        ) -> Result<SearchResponse, SearchIndexError> {
            Ok(SearchResponse::default())
        }

        async fn count(&self, _collection: &str) -> Result<u64, SearchIndexError> {
            Ok(0)
        }

        async fn facet(
            &self,
            _collection: &str,
            _field: &str,
        ) -> Result<Vec<FacetCount>, SearchIndexError> {
            Ok(vec![])
        }
    }

    fn write_csv(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    fn loader_for(
        file: &tempfile::NamedTempFile,
        provider: Arc<RecordingProvider>,
    ) -> CsvLoader {
        let client = Arc::new(SearchIndexClient::new(provider));
        CsvLoader::with_config(
            client,
            LoaderConfig {
                csv_path: file.path().to_path_buf(),
                ..LoaderConfig::default()
            },
        )
    }

    const EMPLOYEES: &[u8] = b"Employee_ID,Full_Name,Department,Gender,Hire_Date\n\
E02001,Ada Lovelace,IT,Female,01/15/2020\n\
E02002,Alan Turing,IT,Male,bad-date\n\
E02003,Grace Hopper,HR,Female,03/09/2019\n";

    #[tokio::test]
    async fn test_load_excludes_column_and_commits() {
        let file = write_csv(EMPLOYEES);
        let provider = Arc::new(RecordingProvider::default());
        let loader = loader_for(&file, provider.clone());

        let summary = loader.load("employees", "Department").await.unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.unparseable_dates, 1);

        let added = provider.added.lock().await;
        assert_eq!(added.len(), 1);
        let (collection, records) = &added[0];
        assert_eq!(collection, "employees");
        assert!(records.iter().all(|r| !r.contains("Department")));
        assert_eq!(
            records[0].get("Hire_Date"),
            Some(&FieldValue::text("2020-01-15T00:00:00Z"))
        );
        assert_eq!(records[1].get("Hire_Date"), Some(&FieldValue::Null));
        assert_eq!(*provider.commits.lock().await, vec!["employees".to_string()]);
    }

    #[tokio::test]
    async fn test_load_serializes_without_null_dates() {
        let file = write_csv(EMPLOYEES);
        let provider = Arc::new(RecordingProvider::default());
        let loader = loader_for(&file, provider.clone());

        loader.load("employees", "Gender").await.unwrap();

        let added = provider.added.lock().await;
        let json = serde_json::to_value(&added[0].1[1]).unwrap();
        assert!(json.get("Hire_Date").is_none());
        assert!(json.get("Gender").is_none());
        assert_eq!(json["Department"], "IT");
    }

    #[tokio::test]
    async fn test_load_latin1_file() {
        let mut contents = b"Employee_ID,Full_Name,Gender\nE02001,Jos".to_vec();
        contents.push(0xE9);
        contents.extend_from_slice(b",Male\n");
        let file = write_csv(&contents);
        let provider = Arc::new(RecordingProvider::default());
        let loader = loader_for(&file, provider.clone());

        loader.load("employees", "Gender").await.unwrap();

        let added = provider.added.lock().await;
        assert_eq!(
            added[0].1[0].get("Full_Name"),
            Some(&FieldValue::text("José"))
        );
    }

    #[tokio::test]
    async fn test_load_missing_column() {
        let file = write_csv(EMPLOYEES);
        let provider = Arc::new(RecordingProvider::default());
        let loader = loader_for(&file, provider.clone());

        let err = loader.load("employees", "Phone").await.unwrap_err();

        assert!(matches!(err, IngestError::MissingColumn(_)));
        assert!(provider.added.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_copies_key_column_into_id() {
        let file = write_csv(EMPLOYEES);
        let provider = Arc::new(RecordingProvider::default());
        let loader = CsvLoader::with_config(
            Arc::new(SearchIndexClient::new(provider.clone())),
            LoaderConfig {
                csv_path: file.path().to_path_buf(),
                id_column: Some("Employee_ID".to_string()),
                ..LoaderConfig::default()
            },
        );

        loader.load("employees", "Employee_ID").await.unwrap();

        let added = provider.added.lock().await;
        let json = serde_json::to_value(&added[0].1[2]).unwrap();
        assert_eq!(json["id"], "E02003");
        assert!(json.get("Employee_ID").is_none());
    }

    #[tokio::test]
    async fn test_load_keeps_duplicate_header_columns() {
        let file = write_csv(b"id,Phone,Phone\nE1,111,222\n");
        let provider = Arc::new(RecordingProvider::default());
        let loader = loader_for(&file, provider.clone());

        loader.load("employees", "id").await.unwrap();

        let added = provider.added.lock().await;
        let json = serde_json::to_value(&added[0].1[0]).unwrap();
        assert_eq!(json, serde_json::json!({"Phone": 111, "Phone.1": 222}));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let provider = Arc::new(RecordingProvider::default());
        let loader = CsvLoader::with_config(
            Arc::new(SearchIndexClient::new(provider)),
            LoaderConfig {
                csv_path: PathBuf::from("/nonexistent/employee_data.csv"),
                ..LoaderConfig::default()
            },
        );

        let err = loader.load("employees", "Department").await.unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}
