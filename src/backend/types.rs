use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// One search against a single collection, as handed to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Full-text query string.
    pub query: String,
    /// Fields to search, in priority order.
    #[serde(default)]
    pub query_by: Vec<String>,
    /// Backend filter expression (opaque to this crate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    /// Backend sort expression (opaque to this crate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Fields to compute facet counts for.
    #[serde(default)]
    pub facet_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Document fields to include in hits (empty = all).
    #[serde(default)]
    pub include_fields: Vec<String>,
    /// Document fields to strip from hits.
    #[serde(default)]
    pub exclude_fields: Vec<String>,
    /// Highlight configuration, when snippet generation is wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightRequest>,
    /// Engine-specific tuning knobs (typo tolerance, cutoff time, pinned
    /// ids, ...) passed through to the backend without interpretation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            query_by: Vec::new(),
            filter_by: None,
            sort_by: None,
            facet_by: Vec::new(),
            page: None,
            per_page: None,
            include_fields: Vec::new(),
            exclude_fields: Vec::new(),
            highlight: None,
            extra: BTreeMap::new(),
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Configuration for search result highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightRequest {
    /// Opening tag for highlighted terms (default: "<mark>")
    #[serde(default = "default_start_tag")]
    pub start_tag: String,
    /// Closing tag for highlighted terms (default: "</mark>")
    #[serde(default = "default_end_tag")]
    pub end_tag: String,
    /// Number of tokens kept on each side of a matched token in a snippet
    #[serde(default = "default_affix_num_tokens")]
    pub affix_num_tokens: usize,
}

fn default_start_tag() -> String {
    "<mark>".to_string()
}
fn default_end_tag() -> String {
    "</mark>".to_string()
}
fn default_affix_num_tokens() -> usize {
    4
}

impl Default for HighlightRequest {
    fn default() -> Self {
        Self {
            start_tag: default_start_tag(),
            end_tag: default_end_tag(),
            affix_num_tokens: default_affix_num_tokens(),
        }
    }
}

/// One hit as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    /// Backend-native relevance score.
    pub score: f32,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    /// Backend-native highlight payload, shape varies per engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Value>,
}

/// Facet counts for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetCount {
    pub field: String,
    pub counts: Vec<FacetValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
}

/// Backend response for one search call against one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub hits: Vec<Hit>,
    /// Total matching documents, independent of pagination.
    pub found: u64,
    #[serde(default)]
    pub facet_counts: Vec<FacetCount>,
    /// Backend-reported search time.
    #[serde(default)]
    pub search_time_ms: u64,
}

/// Declared field list and types for a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<SchemaField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_indexed")]
    pub indexed: bool,
    #[serde(default)]
    pub facet: bool,
    #[serde(default)]
    pub sort: bool,
}

fn default_indexed() -> bool {
    true
}

impl SchemaField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            indexed: true,
            facet: false,
            sort: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    StringArray,
    Int32,
    Int64,
    Float,
    Bool,
    Geopoint,
    Object,
}

impl FieldType {
    /// Whether the field holds searchable text.
    pub fn is_string(self) -> bool {
        matches!(self, FieldType::String | FieldType::StringArray)
    }
}
