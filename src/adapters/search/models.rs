//! Search backend API models
//!
//! Request and response structures for the index, point-in-time and search
//! endpoints. Records are never decoded: hits are kept as borrowed
//! [`RawValue`]s so they reach the output byte-for-byte.

use crate::domain::{ExportError, IndexName, KeepAlive, PitId};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Number of body bytes quoted in error messages
const BODY_EXCERPT_LEN: usize = 512;

/// Response of `POST {index}/_pit`
#[derive(Debug, Clone, Deserialize)]
pub struct PitResponse {
    /// Point-in-time id
    #[serde(default)]
    pub id: Option<String>,
}

impl PitResponse {
    /// Parse the response body and extract the point-in-time id
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the body is not JSON or has no usable id.
    pub fn parse_id(body: &str) -> Result<PitId, ExportError> {
        let response: PitResponse = serde_json::from_str(body).map_err(|e| {
            ExportError::MalformedResponse(format!(
                "point-in-time response is not valid JSON ({e}): {}",
                excerpt(body)
            ))
        })?;

        let id = response.id.unwrap_or_default();
        PitId::new(id).map_err(|e| {
            ExportError::MalformedResponse(format!("{e}: {}", excerpt(body)))
        })
    }
}

/// The `pit` clause attached to every paginated search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitReference {
    /// Point-in-time id
    pub id: PitId,

    /// Keep-alive extension applied by this request
    pub keep_alive: KeepAlive,
}

/// JSON body of a search request
///
/// The caller's query is flattened in; `pit` and `search_after` are owned by
/// the pagination loop.
#[derive(Debug, Clone, Serialize)]
pub struct SearchBody {
    /// Caller's query document (query, sort, _source, ...)
    #[serde(flatten)]
    pub query: Map<String, Value>,

    /// Snapshot the search runs against
    pub pit: PitReference,

    /// Sort values of the last hit of the previous page, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_after: Option<Box<RawValue>>,
}

/// A fully built `POST _search` request
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// `size` URL parameter
    pub size: usize,

    /// `sort` URL parameter, present only when the body carries no sort
    pub sort: Option<String>,

    /// Request body
    pub body: SearchBody,
}

impl SearchRequest {
    /// The `search_after` cursor as sent, if any
    pub fn search_after(&self) -> Option<&str> {
        self.body.search_after.as_deref().map(RawValue::get)
    }
}

#[derive(Deserialize)]
struct RawSearchResponse<'a> {
    #[serde(borrow, default)]
    hits: Option<&'a RawValue>,
}

#[derive(Deserialize)]
struct RawHits<'a> {
    #[serde(default)]
    total: Option<Value>,

    #[serde(borrow, default)]
    hits: Option<&'a RawValue>,
}

#[derive(Deserialize)]
struct HitSort<'a> {
    #[serde(borrow, default)]
    sort: Option<&'a RawValue>,
}

/// One decoded page of search results, borrowing from the response body
#[derive(Debug)]
pub struct SearchPage<'a> {
    total: Option<u64>,
    hits: Option<&'a RawValue>,
}

impl<'a> SearchPage<'a> {
    /// Decode a search response body
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the body is not a JSON object.
    pub fn parse(body: &'a str) -> Result<Self, ExportError> {
        let response: RawSearchResponse<'a> = serde_json::from_str(body).map_err(|e| {
            ExportError::MalformedResponse(format!(
                "search response is not valid JSON ({e}): {}",
                excerpt(body)
            ))
        })?;

        // A non-object `hits` is reported as a missing total or hit sequence
        let decoded = response
            .hits
            .and_then(|raw| serde_json::from_str::<RawHits<'a>>(raw.get()).ok());
        let (total, hits) = match decoded {
            Some(hits) => (hits.total.as_ref().and_then(total_value), hits.hits),
            None => (None, None),
        };

        Ok(Self { total, hits })
    }

    /// Declared total hit count
    ///
    /// Accepts the numeric form and the `{"value": n, "relation": ...}` form.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// The hit sequence, in backend order
    ///
    /// # Errors
    ///
    /// Returns `MissingHits` if `hits.hits` is absent or not an array.
    pub fn hits(&self) -> Result<Vec<Hit<'a>>, ExportError> {
        let raw = self
            .hits
            .ok_or_else(|| ExportError::MissingHits("hits.hits is absent".to_string()))?;

        let hits: Vec<&'a RawValue> = serde_json::from_str(raw.get()).map_err(|_| {
            ExportError::MissingHits(format!("hits.hits is not an array: {}", excerpt(raw.get())))
        })?;

        Ok(hits.into_iter().map(|raw| Hit { raw }).collect())
    }
}

fn total_value(total: &Value) -> Option<u64> {
    match total {
        Value::Number(n) => n.as_u64(),
        Value::Object(obj) => obj.get("value").and_then(Value::as_u64),
        _ => None,
    }
}

/// A single search hit, exactly as the backend serialized it
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    raw: &'a RawValue,
}

impl<'a> Hit<'a> {
    /// Raw JSON text of the hit
    pub fn raw(&self) -> &'a str {
        self.raw.get()
    }

    /// Size of the raw hit in bytes
    pub fn byte_len(&self) -> usize {
        self.raw.get().len()
    }

    /// The hit's `sort` array, verbatim
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the hit is not an object.
    pub fn sort_values(&self) -> Result<Option<&'a RawValue>, ExportError> {
        let hit: HitSort<'a> = serde_json::from_str(self.raw.get()).map_err(|e| {
            ExportError::MalformedResponse(format!("search hit is not an object: {e}"))
        })?;
        Ok(hit.sort)
    }
}

/// Extract the mapping line from a `GET {index}` response
///
/// The response is keyed by concrete index name. When `index` is an alias the
/// key differs; a response holding exactly one index is then used as-is.
///
/// # Errors
///
/// Returns `MalformedResponse` if the body is not a JSON object or does not
/// identify a single index.
pub fn extract_mapping(body: &str, index: &IndexName) -> Result<String, ExportError> {
    let indices: BTreeMap<String, &RawValue> = serde_json::from_str(body).map_err(|e| {
        ExportError::MalformedResponse(format!(
            "index response is not a JSON object ({e}): {}",
            excerpt(body)
        ))
    })?;

    if let Some(raw) = indices.get(index.as_str()) {
        return Ok(raw.get().to_string());
    }

    let mut entries = indices.into_iter();
    match (entries.next(), entries.next()) {
        (Some((name, raw)), None) => {
            tracing::debug!(index = %index, resolved = %name, "Index name resolved through alias");
            Ok(raw.get().to_string())
        }
        _ => Err(ExportError::MalformedResponse(format!(
            "index response has no entry for '{index}': {}",
            excerpt(body)
        ))),
    }
}

/// Truncate a body for inclusion in an error message
pub(crate) fn excerpt(body: &str) -> &str {
    if body.len() <= BODY_EXCERPT_LEN {
        return body;
    }
    let mut end = BODY_EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index(name: &str) -> IndexName {
        IndexName::new(name).unwrap()
    }

    #[test]
    fn test_pit_id_parsed() {
        let id = PitResponse::parse_id(r#"{"id":"46ToAwMDaWR5"}"#).unwrap();
        assert_eq!(id.as_str(), "46ToAwMDaWR5");
    }

    #[test]
    fn test_pit_id_missing_is_malformed() {
        let err = PitResponse::parse_id(r#"{"error":"index_not_found"}"#).unwrap_err();
        assert!(matches!(err, ExportError::MalformedResponse(_)));

        let err = PitResponse::parse_id("<html>").unwrap_err();
        assert!(matches!(err, ExportError::MalformedResponse(_)));
    }

    #[test]
    fn test_search_body_serialization() {
        let mut query = Map::new();
        query.insert("query".to_string(), json!({"term": {"status": "active"}}));

        let body = SearchBody {
            query,
            pit: PitReference {
                id: PitId::new("abc").unwrap(),
                keep_alive: KeepAlive::default(),
            },
            search_after: Some(RawValue::from_string("[42,\"doc-9\"]".to_string()).unwrap()),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "query": {"term": {"status": "active"}},
                "pit": {"id": "abc", "keep_alive": "1m"},
                "search_after": [42, "doc-9"]
            })
        );
    }

    #[test]
    fn test_search_body_omits_empty_cursor() {
        let body = SearchBody {
            query: Map::new(),
            pit: PitReference {
                id: PitId::new("abc").unwrap(),
                keep_alive: KeepAlive::default(),
            },
            search_after: None,
        };

        let text = serde_json::to_string(&body).unwrap();
        assert_eq!(text, r#"{"pit":{"id":"abc","keep_alive":"1m"}}"#);
    }

    #[test]
    fn test_page_total_forms() {
        let legacy = SearchPage::parse(r#"{"hits":{"total":7,"hits":[]}}"#).unwrap();
        assert_eq!(legacy.total(), Some(7));

        let modern =
            SearchPage::parse(r#"{"hits":{"total":{"value":12,"relation":"eq"},"hits":[]}}"#)
                .unwrap();
        assert_eq!(modern.total(), Some(12));

        let missing = SearchPage::parse(r#"{"hits":{"hits":[]}}"#).unwrap();
        assert_eq!(missing.total(), None);

        let no_hits = SearchPage::parse(r#"{"took":3}"#).unwrap();
        assert_eq!(no_hits.total(), None);
    }

    #[test]
    fn test_page_hits_are_raw() {
        let body = r#"{"hits":{"total":2,"hits":[{"_id":"a","_source":{"n":1.50},"sort":["a"]},{"_id":"b","sort":["b"]}]}}"#;
        let page = SearchPage::parse(body).unwrap();
        let hits = page.hits().unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].raw(), r#"{"_id":"a","_source":{"n":1.50},"sort":["a"]}"#);
        assert_eq!(hits[0].byte_len(), hits[0].raw().len());
        assert_eq!(hits[1].sort_values().unwrap().unwrap().get(), r#"["b"]"#);
    }

    #[test]
    fn test_page_missing_hits() {
        let page = SearchPage::parse(r#"{"hits":{"total":3}}"#).unwrap();
        assert!(matches!(page.hits(), Err(ExportError::MissingHits(_))));

        let page = SearchPage::parse(r#"{"hits":{"total":3,"hits":{"a":1}}}"#).unwrap();
        assert!(matches!(page.hits(), Err(ExportError::MissingHits(_))));
    }

    #[test]
    fn test_page_hits_not_an_object() {
        for body in [r#"{"hits":[]}"#, r#"{"hits":null}"#, r#"{"hits":"none"}"#] {
            let page = SearchPage::parse(body).unwrap();
            assert_eq!(page.total(), None);
            assert!(matches!(page.hits(), Err(ExportError::MissingHits(_))));
        }
    }

    #[test]
    fn test_page_invalid_json() {
        assert!(matches!(
            SearchPage::parse("not json"),
            Err(ExportError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_hit_without_sort() {
        let page = SearchPage::parse(r#"{"hits":{"total":1,"hits":[{"_id":"a"}]}}"#).unwrap();
        let hits = page.hits().unwrap();
        assert!(hits[0].sort_values().unwrap().is_none());
    }

    #[test]
    fn test_extract_mapping_by_name() {
        let body = r#"{"products":{"aliases":{},"mappings":{"properties":{"sku":{"type":"keyword"}}}}}"#;
        let mapping = extract_mapping(body, &index("products")).unwrap();
        assert_eq!(
            mapping,
            r#"{"aliases":{},"mappings":{"properties":{"sku":{"type":"keyword"}}}}"#
        );
    }

    #[test]
    fn test_extract_mapping_through_alias() {
        let body = r#"{"products-v3":{"mappings":{}}}"#;
        let mapping = extract_mapping(body, &index("products")).unwrap();
        assert_eq!(mapping, r#"{"mappings":{}}"#);
    }

    #[test]
    fn test_extract_mapping_ambiguous_or_invalid() {
        let body = r#"{"a-1":{"mappings":{}},"a-2":{"mappings":{}}}"#;
        assert!(matches!(
            extract_mapping(body, &index("a")),
            Err(ExportError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_mapping("[]", &index("a")),
            Err(ExportError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let cut = excerpt(&body);
        assert!(cut.len() <= BODY_EXCERPT_LEN);
        assert!(body.starts_with(cut));
    }
}
