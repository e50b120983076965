//! Solr request builders.
//!
//! This module builds the query parameters and JSON update bodies sent to
//! the Solr HTTP API.

use serde_json::{json, Value};

use solr_loader_shared::SearchQuery;

/// Query matching every document.
pub const MATCH_ALL: &str = "*:*";

/// Facet limit meaning "return every distinct value".
const UNLIMITED_FACETS: &str = "-1";

/// Escape characters that have meaning in the Lucene query syntax.
///
/// Follows the character set escaped by SolrJ's `ClientUtils.escapeQueryChars`,
/// including whitespace, so multi-word values match as a single term.
pub fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '+'
                | '-'
                | '!'
                | '('
                | ')'
                | ':'
                | '^'
                | '['
                | ']'
                | '"'
                | '{'
                | '}'
                | '~'
                | '*'
                | '?'
                | '|'
                | '&'
                | ';'
                | '/'
        ) || c.is_whitespace()
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the `q` parameter for a field search.
pub fn build_field_query(query: &SearchQuery) -> String {
    if query.raw {
        format!("{}:{}", query.field, query.value)
    } else {
        format!("{}:{}", query.field, escape_query_value(&query.value))
    }
}

/// Parameters for a field search.
pub fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    vec![
        ("q", build_field_query(query)),
        ("rows", query.rows.to_string()),
        ("wt", "json".to_string()),
    ]
}

/// Parameters for a hit-count-only query over the whole collection.
pub fn count_params() -> Vec<(&'static str, String)> {
    vec![
        ("q", MATCH_ALL.to_string()),
        ("rows", "0".to_string()),
        ("wt", "json".to_string()),
    ]
}

/// Parameters for an unlimited facet over one field.
pub fn facet_params(field: &str) -> Vec<(&'static str, String)> {
    vec![
        ("q", MATCH_ALL.to_string()),
        ("rows", "0".to_string()),
        ("facet", "true".to_string()),
        ("facet.field", field.to_string()),
        ("facet.limit", UNLIMITED_FACETS.to_string()),
        ("wt", "json".to_string()),
    ]
}

/// Parameters for the core admin STATUS action.
pub fn core_status_params(collection: &str) -> Vec<(&'static str, String)> {
    vec![
        ("action", "STATUS".to_string()),
        ("core", collection.to_string()),
        ("wt", "json".to_string()),
    ]
}

/// JSON update body deleting one document by id.
pub fn delete_by_id_body(id: &str) -> Value {
    json!({ "delete": { "id": id } })
}

/// JSON update body committing pending changes.
pub fn commit_body() -> Value {
    json!({ "commit": {} })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_value() {
        assert_eq!(escape_query_value("IT"), "IT");
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_query_value("R&D"), "R\\&D");
        assert_eq!(escape_query_value("a:b"), "a\\:b");
        assert_eq!(escape_query_value("Human Resources"), "Human\\ Resources");
        assert_eq!(escape_query_value("C:\\x"), "C\\:\\\\x");
    }

    #[test]
    fn test_build_field_query() {
        let query = SearchQuery::field("Department", "R&D");
        assert_eq!(build_field_query(&query), "Department:R\\&D");

        let raw = SearchQuery::field("First_Name", "Jo*").raw();
        assert_eq!(build_field_query(&raw), "First_Name:Jo*");
    }

    #[test]
    fn test_search_params() {
        let query = SearchQuery::field("Gender", "Male").with_rows(5);
        let params = search_params(&query);

        assert!(params.contains(&("q", "Gender:Male".to_string())));
        assert!(params.contains(&("rows", "5".to_string())));
        assert!(params.contains(&("wt", "json".to_string())));
    }

    #[test]
    fn test_count_params() {
        let params = count_params();

        assert!(params.contains(&("q", "*:*".to_string())));
        assert!(params.contains(&("rows", "0".to_string())));
    }

    #[test]
    fn test_facet_params() {
        let params = facet_params("Department");

        assert!(params.contains(&("facet", "true".to_string())));
        assert!(params.contains(&("facet.field", "Department".to_string())));
        assert!(params.contains(&("facet.limit", "-1".to_string())));
    }

    #[test]
    fn test_update_bodies() {
        assert_eq!(delete_by_id_body("E02003")["delete"]["id"], "E02003");
        assert!(commit_body()["commit"].is_object());
    }
}
