//! Parsers for Solr JSON responses.

use serde_json::Value;

use crate::errors::SearchIndexError;
use solr_loader_shared::{FacetCount, SearchResponse};

/// Determine whether a core admin STATUS response describes `collection`.
///
/// Solr answers a STATUS request for an unknown core with an empty object
/// under the core's name, so presence of the key alone is not enough.
pub fn parse_core_status(body: &Value, collection: &str) -> Result<bool, SearchIndexError> {
    let status = body
        .get("status")
        .and_then(Value::as_object)
        .ok_or_else(|| SearchIndexError::parse("STATUS response has no 'status' object"))?;

    Ok(status
        .get(collection)
        .and_then(Value::as_object)
        .is_some_and(|core| !core.is_empty()))
}

/// Parse the `response` block of a select response.
pub fn parse_select(body: &Value) -> Result<SearchResponse, SearchIndexError> {
    let response = body
        .get("response")
        .ok_or_else(|| SearchIndexError::parse("select response has no 'response' block"))?;

    let num_found = response
        .get("numFound")
        .and_then(Value::as_u64)
        .ok_or_else(|| SearchIndexError::parse("select response has no 'numFound'"))?;

    let docs = response
        .get("docs")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .filter_map(|doc| doc.as_object().cloned())
                .collect()
        })
        .unwrap_or_default();

    Ok(SearchResponse { num_found, docs })
}

/// Parse the facet counts for `field` from a select response.
///
/// Solr returns facet fields as a flat list alternating value and count:
/// `["IT", 12, "HR", 4]`.
pub fn parse_facet(body: &Value, field: &str) -> Result<Vec<FacetCount>, SearchIndexError> {
    let entries = body
        .get("facet_counts")
        .and_then(|f| f.get("facet_fields"))
        .and_then(|f| f.get(field))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SearchIndexError::parse(format!("response has no facet counts for '{}'", field))
        })?;

    if entries.len() % 2 != 0 {
        return Err(SearchIndexError::parse(format!(
            "facet list for '{}' has odd length {}",
            field,
            entries.len()
        )));
    }

    entries
        .chunks(2)
        .map(|pair| {
            let value = match &pair[0] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let count = pair[1].as_u64().ok_or_else(|| {
                SearchIndexError::parse(format!("facet count for '{}' is not a number", value))
            })?;
            Ok(FacetCount { value, count })
        })
        .collect()
}

/// Extract a readable message from a Solr error body.
///
/// Falls back to the raw body when it is not a Solr JSON error.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
