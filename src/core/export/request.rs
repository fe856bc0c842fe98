//! Search request construction
//!
//! A [`QueryTemplate`] is built once per export from the caller's query and
//! stamps out the request for each page.

use crate::adapters::search::{PitReference, SearchBody, SearchRequest};
use crate::domain::{ElastictlError, KeepAlive, PitId, Result};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

/// Keys the pagination loop owns. Caller-supplied values are dropped.
const RESERVED_KEYS: [&str; 2] = ["pit", "search_after"];

/// Parse a caller-supplied query document
///
/// An empty or whitespace-only input means "match everything".
///
/// # Errors
///
/// Returns a validation error if the input is not a JSON object.
///
/// # Example
///
/// ```
/// use elastictl::core::export::request::parse_query;
///
/// let query = parse_query(r#"{"query":{"match_all":{}}}"#).unwrap();
/// assert!(query.contains_key("query"));
/// assert!(parse_query("").unwrap().is_empty());
/// assert!(parse_query("[1,2]").is_err());
/// ```
pub fn parse_query(input: &str) -> Result<Map<String, Value>> {
    if input.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ElastictlError::Validation(format!(
            "Search query must be a JSON object, got: {other}"
        ))),
        Err(e) => Err(ElastictlError::Validation(format!(
            "Search query is not valid JSON: {e}"
        ))),
    }
}

/// Per-export request builder
#[derive(Debug, Clone)]
pub struct QueryTemplate {
    query: Map<String, Value>,
    sort: Option<String>,
}

impl QueryTemplate {
    /// Build the template, injecting `default_sort_field` when the query has no sort
    pub fn new(mut query: Map<String, Value>, default_sort_field: &str) -> Self {
        for key in RESERVED_KEYS {
            if query.remove(key).is_some() {
                tracing::warn!(key = key, "Ignoring caller-supplied pagination key in query");
            }
        }

        let sort = if query.contains_key("sort") {
            None
        } else {
            Some(default_sort_field.to_string())
        };

        Self { query, sort }
    }

    /// The injected sort field, if the caller did not supply a sort
    pub fn default_sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Request for the first page
    pub fn first_page(&self, pit: &PitId, keep_alive: &KeepAlive, size: usize) -> SearchRequest {
        self.build(pit, keep_alive, size, None)
    }

    /// Request for the page following the hit whose sort values are `cursor`
    pub fn next_page(
        &self,
        pit: &PitId,
        keep_alive: &KeepAlive,
        size: usize,
        cursor: Box<RawValue>,
    ) -> SearchRequest {
        self.build(pit, keep_alive, size, Some(cursor))
    }

    fn build(
        &self,
        pit: &PitId,
        keep_alive: &KeepAlive,
        size: usize,
        search_after: Option<Box<RawValue>>,
    ) -> SearchRequest {
        SearchRequest {
            size,
            sort: self.sort.clone(),
            body: SearchBody {
                query: self.query.clone(),
                pit: PitReference {
                    id: pit.clone(),
                    keep_alive: keep_alive.clone(),
                },
                search_after,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pit() -> PitId {
        PitId::new("pit-1").unwrap()
    }

    #[test]
    fn test_parse_query_rejects_non_objects() {
        assert!(parse_query("42").is_err());
        assert!(parse_query("\"match_all\"").is_err());
        assert!(parse_query("{").is_err());
    }

    #[test]
    fn test_default_sort_injected_when_absent() {
        let template = QueryTemplate::new(Map::new(), "_id");
        let request = template.first_page(&pit(), &KeepAlive::default(), 10_000);

        assert_eq!(template.default_sort(), Some("_id"));
        assert_eq!(request.sort.as_deref(), Some("_id"));
        assert_eq!(request.size, 10_000);
        assert!(request.search_after().is_none());
    }

    #[test]
    fn test_caller_sort_preserved() {
        let query = parse_query(r#"{"sort":[{"timestamp":"asc"},{"_id":"asc"}]}"#).unwrap();
        let template = QueryTemplate::new(query, "_id");
        let request = template.first_page(&pit(), &KeepAlive::default(), 100);

        assert!(request.sort.is_none());
        assert_eq!(
            request.body.query.get("sort"),
            Some(&json!([{"timestamp":"asc"},{"_id":"asc"}]))
        );
    }

    #[test]
    fn test_reserved_keys_replaced() {
        let query = parse_query(r#"{"pit":{"id":"stale"},"search_after":[1],"size":5}"#).unwrap();
        let template = QueryTemplate::new(query, "_id");
        let request = template.first_page(&pit(), &KeepAlive::default(), 100);

        let body = serde_json::to_value(&request.body).unwrap();
        assert_eq!(body["pit"], json!({"id": "pit-1", "keep_alive": "1m"}));
        assert!(body.get("search_after").is_none());
        assert_eq!(body["size"], json!(5));
    }

    #[test]
    fn test_next_page_carries_cursor_verbatim() {
        let template = QueryTemplate::new(Map::new(), "_id");
        let cursor = RawValue::from_string("[1.0000000000000002,\"x\"]".to_string()).unwrap();
        let request = template.next_page(&pit(), &KeepAlive::default(), 10, cursor);

        assert_eq!(request.search_after(), Some("[1.0000000000000002,\"x\"]"));
        assert_eq!(request.sort.as_deref(), Some("_id"));

        let text = serde_json::to_string(&request.body).unwrap();
        assert!(text.contains(r#""search_after":[1.0000000000000002,"x"]"#));
    }
}
