use crate::aggregate::merger::MergeStrategy;
use crate::backend::{FacetCount, HighlightRequest, ResponseEnvelope};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Per-collection search intent for one aggregation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionQueryConfig {
    /// Backend collection name.
    pub collection: String,
    /// Optional caller-side tag carried through to merged hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Explicit fields to search; inferred from the schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_by: Option<Vec<String>>,
    /// Explicit sort expression; inferred from the schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_by: Option<Vec<String>>,
    /// Maximum hits wanted from this collection.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Relevance weight applied to this collection's normalized scores.
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub include_fields: Vec<String>,
    #[serde(default)]
    pub exclude_fields: Vec<String>,
    /// Engine-specific tuning knobs, forwarded opaquely.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

fn default_max_results() -> usize {
    10
}

fn default_weight() -> f32 {
    1.0
}

impl CollectionQueryConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            namespace: None,
            query_by: None,
            sort_by: None,
            filter_by: None,
            facet_by: None,
            max_results: default_max_results(),
            weight: default_weight(),
            include_fields: Vec::new(),
            exclude_fields: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Which shape of result list the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMode {
    /// One cross-collection ranked list.
    #[default]
    Interleaved,
    /// Per-collection lists only.
    PerCollection,
    /// Both shapes.
    Both,
}

impl ResultMode {
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "interleaved" => Ok(ResultMode::Interleaved),
            "per_collection" => Ok(ResultMode::PerCollection),
            "both" => Ok(ResultMode::Both),
            other => Err(Error::Config(format!("invalid result mode: {}", other))),
        }
    }

    pub fn includes_interleaved(self) -> bool {
        matches!(self, ResultMode::Interleaved | ResultMode::Both)
    }

    pub fn includes_per_collection(self) -> bool {
        matches!(self, ResultMode::PerCollection | ResultMode::Both)
    }
}

/// Per-call options for one aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateOptions {
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    /// Rescale scores to [0, 1] within each collection before weighting.
    #[serde(default = "default_true")]
    pub normalize_scores: bool,
    #[serde(default)]
    pub result_mode: ResultMode,
    /// Cap on the combined hit list after merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_max_results: Option<usize>,
    #[serde(default)]
    pub enable_highlighting: bool,
    /// Tag and snippet settings used when highlighting is enabled.
    #[serde(default)]
    pub highlight: HighlightRequest,
    /// Consult the gateway cache for each branch (default: true).
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            merge_strategy: MergeStrategy::default(),
            normalize_scores: true,
            result_mode: ResultMode::default(),
            global_max_results: None,
            enable_highlighting: false,
            highlight: HighlightRequest::default(),
            use_cache: true,
        }
    }
}

/// Successful backend response for one collection within one aggregation
/// call. Transient; discarded after merging.
#[derive(Debug, Clone)]
pub struct CollectionResult {
    pub collection: String,
    pub namespace: Option<String>,
    pub response: Arc<ResponseEnvelope>,
    /// Wall-clock time for this branch, schema fetch included.
    pub elapsed_ms: u64,
}

/// One uniform highlight span, normalized from the backend's native shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub field: String,
    pub snippet: String,
    #[serde(default)]
    pub matched_tokens: Vec<String>,
}

/// A hit annotated with its provenance and cross-collection score.
#[derive(Debug, Clone, Serialize)]
pub struct MergedHit {
    pub id: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// 1-based rank within the source collection's own result list.
    pub rank: usize,
    pub raw_score: f32,
    /// Score rescaled to [0, 1] within the source collection.
    pub normalized_score: f32,
    pub weight: f32,
    /// normalized_score * weight; the cross-collection ordering key.
    pub merged_score: f32,
    pub fields: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<HighlightSpan>>,
}

/// Found/included/latency/facets for one successful collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub found: u64,
    /// Hits actually carried into the merge.
    pub included: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facet_counts: Vec<FacetCount>,
    /// Populated when the result mode includes per-collection grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<Vec<MergedHit>>,
}

/// The final answer to one aggregation call. Every configured collection
/// appears either in `collections` or in `errors_by_collection`.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResponse {
    /// Cross-collection ranked list; absent in per-collection-only mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<Vec<MergedHit>>,
    pub collections: Vec<CollectionSummary>,
    pub errors_by_collection: HashMap<String, String>,
    pub elapsed_ms: u64,
}
