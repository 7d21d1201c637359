use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One matched record, as returned by the engine.
///
/// Documents keep their engine-side field names. When highlighting was
/// requested and the engine returned fragments for a document, they are
/// merged in under a `highlighted` key (see [`SearchResults`]).
pub type Document = Map<String, Value>;

/// Raw select response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    #[serde(rename = "responseHeader", default)]
    pub header: Option<ResponseHeader>,

    pub response: ResponseBody,

    /// Fragment maps keyed by document id, present when highlighting ran
    #[serde(default)]
    pub highlighting: Option<Map<String, Value>>,

    /// Facet payload, present when any facet option was requested
    #[serde(default)]
    pub facet_counts: Option<FacetCounts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub status: i64,

    #[serde(rename = "QTime", default)]
    pub qtime: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "numFound")]
    pub num_found: u64,

    #[serde(default)]
    pub start: u64,

    #[serde(default)]
    pub docs: Vec<Document>,
}

/// Facet counts mirroring the engine's `facet_counts` payload.
///
/// Field counts arrive as maps (the select request asks for map-style
/// named lists), so values can be read directly per term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetCounts {
    #[serde(default)]
    pub facet_queries: Map<String, Value>,

    #[serde(default)]
    pub facet_fields: Map<String, Value>,

    #[serde(default)]
    pub facet_ranges: Map<String, Value>,
}

/// Shaped outcome of one search call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total matches ignoring paging
    pub num_found: u64,

    /// Offset echoed by the engine
    pub start: u64,

    /// The page of matched documents, highlight fragments merged in
    pub docs: Vec<Document>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetCounts>,
}

impl SearchResults {
    /// Facet counts for a single field, when present
    pub fn field_facets(&self, field: &str) -> Option<&Value> {
        self.facets.as_ref()?.facet_fields.get(field)
    }

    /// The full facet-fields mapping, when facet data came back
    pub fn facet_fields(&self) -> Option<&Map<String, Value>> {
        self.facets.as_ref().map(|facets| &facets.facet_fields)
    }
}

impl From<SelectResponse> for SearchResults {
    fn from(select: SelectResponse) -> Self {
        let mut docs = select.response.docs;

        if let Some(highlighting) = select.highlighting {
            for doc in &mut docs {
                let Some(id) = doc.get("id").map(doc_id_key) else {
                    continue;
                };
                if let Some(fragments) = highlighting.get(&id) {
                    doc.insert("highlighted".to_string(), fragments.clone());
                }
            }
        }

        SearchResults {
            num_found: select.response.num_found,
            start: select.response.start,
            docs,
            facets: select.facet_counts,
        }
    }
}

/// Highlighting entries are keyed by the document id rendered as a string
fn doc_id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: &str) -> SearchResults {
        let select: SelectResponse = serde_json::from_str(body).unwrap();
        SearchResults::from(select)
    }

    #[test]
    fn test_highlight_merge_by_id() {
        let results = decode(
            r#"{
                "response": {"numFound": 2, "start": 0, "docs": [{"id": "a"}, {"id": "b"}]},
                "highlighting": {"a": {"title": ["<em>x</em>"]}}
            }"#,
        );

        assert_eq!(results.num_found, 2);
        assert_eq!(results.docs.len(), 2);
        assert_eq!(
            results.docs[0].get("highlighted"),
            Some(&json!({"title": ["<em>x</em>"]}))
        );
        assert!(results.docs[1].get("highlighted").is_none());
    }

    #[test]
    fn test_numeric_document_ids_match_highlighting() {
        let results = decode(
            r#"{
                "response": {"numFound": 1, "start": 0, "docs": [{"id": 5}]},
                "highlighting": {"5": {"body": ["<em>hit</em>"]}}
            }"#,
        );

        assert_eq!(
            results.docs[0].get("highlighted"),
            Some(&json!({"body": ["<em>hit</em>"]}))
        );
    }

    #[test]
    fn test_documents_without_id_are_left_alone() {
        let results = decode(
            r#"{
                "response": {"numFound": 1, "start": 0, "docs": [{"title": "orphan"}]},
                "highlighting": {"a": {"title": ["<em>x</em>"]}}
            }"#,
        );

        assert!(results.docs[0].get("highlighted").is_none());
    }

    #[test]
    fn test_facets_attach_when_present() {
        let results = decode(
            r#"{
                "response": {"numFound": 0, "start": 0, "docs": []},
                "facet_counts": {
                    "facet_queries": {},
                    "facet_fields": {"color": {"red": 5, "blue": 2}},
                    "facet_ranges": {}
                }
            }"#,
        );

        assert_eq!(
            results.field_facets("color"),
            Some(&json!({"red": 5, "blue": 2}))
        );
        assert!(results.field_facets("missing_field").is_none());
        assert_eq!(results.facet_fields().unwrap().len(), 1);
    }

    #[test]
    fn test_no_facet_data_yields_none() {
        let results = decode(r#"{"response": {"numFound": 0, "start": 0, "docs": []}}"#);

        assert!(results.facets.is_none());
        assert!(results.field_facets("color").is_none());
        assert!(results.facet_fields().is_none());
    }

    #[test]
    fn test_header_is_optional() {
        let results = decode(
            r#"{
                "responseHeader": {"status": 0, "QTime": 7},
                "response": {"numFound": 1, "start": 10, "docs": [{"id": "z"}]}
            }"#,
        );

        assert_eq!(results.start, 10);
        assert_eq!(results.num_found, 1);
    }
}
