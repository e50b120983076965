//! Task functions behind each command.
//!
//! Every task performs one operation, writes a human-readable result to
//! `out`, and returns the typed outcome. [`run_all`] strings them together
//! in a fixed sequence where a failing step is reported and skipped.

use std::io::Write;
use tracing::{error, info};

use crate::config::Dependencies;
use crate::AppError;
use solr_loader_ingest::LoadSummary;
use solr_loader_shared::{FacetCount, ProvisionOutcome, SearchQuery, SearchResponse};

/// Ensure a collection exists, creating it if needed.
pub async fn create_collection<W: Write>(
    deps: &Dependencies,
    collection: &str,
    out: &mut W,
) -> Result<ProvisionOutcome, AppError> {
    let outcome = deps.provisioner.ensure_collection(collection).await?;
    match outcome {
        ProvisionOutcome::AlreadyExists => {
            writeln!(out, "Collection {} already exists.", collection)?
        }
        ProvisionOutcome::Created => {
            writeln!(out, "Collection {} created successfully.", collection)?
        }
    }
    Ok(outcome)
}

/// Load the CSV file into a collection, excluding one column.
pub async fn index_data<W: Write>(
    deps: &Dependencies,
    collection: &str,
    exclude_column: &str,
    out: &mut W,
) -> Result<LoadSummary, AppError> {
    let summary = deps.loader.load(collection, exclude_column).await?;
    writeln!(
        out,
        "Data indexed in {} excluding {} ({} records).",
        collection, exclude_column, summary.records
    )?;
    Ok(summary)
}

/// Search a collection by field value and print each matching document.
pub async fn search_by_field<W: Write>(
    deps: &Dependencies,
    collection: &str,
    query: &SearchQuery,
    out: &mut W,
) -> Result<SearchResponse, AppError> {
    let response = deps.search.search(collection, query).await?;
    for doc in &response.docs {
        writeln!(out, "{}", serde_json::Value::Object(doc.clone()))?;
    }
    info!(
        collection = %collection,
        field = %query.field,
        num_found = response.num_found,
        returned = response.docs.len(),
        "Search completed"
    );
    Ok(response)
}

/// Print the number of documents in a collection.
pub async fn count_documents<W: Write>(
    deps: &Dependencies,
    collection: &str,
    out: &mut W,
) -> Result<u64, AppError> {
    let count = deps.search.count(collection).await?;
    writeln!(out, "Document count in {}: {}", collection, count)?;
    Ok(count)
}

/// Delete a document by id and commit.
pub async fn delete_by_id<W: Write>(
    deps: &Dependencies,
    collection: &str,
    id: &str,
    out: &mut W,
) -> Result<(), AppError> {
    deps.search.delete(collection, id).await?;
    writeln!(out, "Document {} deleted from {}.", id, collection)?;
    Ok(())
}

/// Print value counts for every distinct value of a field.
pub async fn facet_counts<W: Write>(
    deps: &Dependencies,
    collection: &str,
    field: &str,
    out: &mut W,
) -> Result<Vec<FacetCount>, AppError> {
    let facets = deps.search.facet(collection, field).await?;
    writeln!(out, "Facet counts for {} in {}:", field, collection)?;
    for facet in &facets {
        writeln!(out, "  {}", facet)?;
    }
    Ok(facets)
}

/// The fixed sequence executed by [`run_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverPlan {
    /// First collection; loaded without `primary_exclude`.
    pub primary: String,
    /// Second collection; loaded without `secondary_exclude`.
    pub secondary: String,
    pub primary_exclude: String,
    pub secondary_exclude: String,
    /// Document deleted from the primary collection after loading.
    pub delete_id: String,
    /// Field searches as `(collection, query)`.
    pub searches: Vec<(String, SearchQuery)>,
    /// Field faceted on both collections.
    pub facet_field: String,
}

impl DriverPlan {
    /// Build the standard plan for two collections.
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        let primary = primary.into();
        let secondary = secondary.into();
        Self {
            searches: vec![
                (primary.clone(), SearchQuery::field("Department", "IT")),
                (primary.clone(), SearchQuery::field("Gender", "Male")),
                (secondary.clone(), SearchQuery::field("Department", "IT")),
            ],
            primary,
            secondary,
            primary_exclude: "Department".to_string(),
            secondary_exclude: "Gender".to_string(),
            delete_id: "E02003".to_string(),
            facet_field: "Department".to_string(),
        }
    }

    /// Replace the id deleted from the primary collection.
    pub fn with_delete_id(mut self, id: impl Into<String>) -> Self {
        self.delete_id = id.into();
        self
    }

    /// Replace the columns excluded from the primary and secondary loads.
    pub fn with_excludes(
        mut self,
        primary_exclude: impl Into<String>,
        secondary_exclude: impl Into<String>,
    ) -> Self {
        self.primary_exclude = primary_exclude.into();
        self.secondary_exclude = secondary_exclude.into();
        self
    }

    /// Replace the field faceted on both collections.
    pub fn with_facet_field(mut self, field: impl Into<String>) -> Self {
        self.facet_field = field.into();
        self
    }

    /// Replace the field searches.
    pub fn with_searches(mut self, searches: Vec<(String, SearchQuery)>) -> Self {
        self.searches = searches;
        self
    }
}

impl Default for DriverPlan {
    fn default() -> Self {
        Self::new("Hash_Dileep", "Hash_1234")
    }
}

/// Number of steps that succeeded and failed in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record<T, W: Write>(&mut self, step: &str, result: Result<T, AppError>, out: &mut W) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(e) => {
                self.failed += 1;
                error!(step = %step, error = %e, "Step failed");
                // A broken stdout must not abort the run either.
                let _ = writeln!(out, "Error during {}: {}", step, e);
            }
        }
    }
}

/// Run the whole plan. No step failure stops the sequence.
pub async fn run_all<W: Write>(deps: &Dependencies, plan: &DriverPlan, out: &mut W) -> RunSummary {
    let mut summary = RunSummary::default();

    for collection in [&plan.primary, &plan.secondary] {
        let result = create_collection(deps, collection, out).await;
        summary.record("create collection", result, out);
    }

    let result = count_documents(deps, &plan.primary, out).await;
    summary.record("count", result, out);

    let result = index_data(deps, &plan.primary, &plan.primary_exclude, out).await;
    summary.record("index", result, out);
    let result = index_data(deps, &plan.secondary, &plan.secondary_exclude, out).await;
    summary.record("index", result, out);

    let result = delete_by_id(deps, &plan.primary, &plan.delete_id, out).await;
    summary.record("delete", result, out);

    let result = count_documents(deps, &plan.primary, out).await;
    summary.record("count", result, out);

    for (collection, query) in &plan.searches {
        let result = search_by_field(deps, collection, query, out).await;
        summary.record("search", result, out);
    }

    for collection in [&plan.primary, &plan.secondary] {
        let result = facet_counts(deps, collection, &plan.facet_field, out).await;
        summary.record("facet", result, out);
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Run complete"
    );
    summary
}
