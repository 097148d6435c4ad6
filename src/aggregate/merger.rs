//! Result merging strategies for multi-collection aggregation
//!
//! Three closed strategies, dispatched from a single switch:
//! - Relevance: normalize scores within each collection, weight, sort globally
//! - RoundRobin: rotate over collections in declaration order
//! - CollectionOrder: concatenate per-collection lists in declaration order

use crate::aggregate::types::{CollectionQueryConfig, CollectionResult, HighlightSpan, MergedHit};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strategy for combining ranked per-collection result lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Cross-collection ordering by normalized, weighted score.
    #[default]
    Relevance,
    /// One hit per collection per round, in declaration order.
    RoundRobin,
    /// Full per-collection lists back to back, no score comparison.
    CollectionOrder,
}

impl MergeStrategy {
    /// Parse the wire spelling, rejecting unknown values.
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(MergeStrategy::Relevance),
            "round_robin" | "roundrobin" => Ok(MergeStrategy::RoundRobin),
            "collection_order" | "collectionorder" => Ok(MergeStrategy::CollectionOrder),
            other => Err(Error::Config(format!("invalid merge strategy: {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MergeStrategy::Relevance => "relevance",
            MergeStrategy::RoundRobin => "round_robin",
            MergeStrategy::CollectionOrder => "collection_order",
        }
    }
}

/// Knobs for one merge pass.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub strategy: MergeStrategy,
    pub normalize_scores: bool,
    pub global_max_results: Option<usize>,
    /// Reshape backend-native highlight payloads into uniform spans.
    pub normalize_highlights: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::Relevance,
            normalize_scores: true,
            global_max_results: None,
            normalize_highlights: false,
        }
    }
}

/// Merge per-collection result sets into one ranked, annotated sequence.
///
/// `results` and `configs` are parallel slices in collection declaration
/// order. Relevance ties are broken by declaration order, then by a hit's
/// rank within its own collection (the stable sort preserves build order).
pub fn merge(
    results: &[CollectionResult],
    configs: &[CollectionQueryConfig],
    options: &MergeOptions,
) -> Vec<MergedHit> {
    let per_collection: Vec<Vec<MergedHit>> = results
        .iter()
        .zip(configs.iter())
        .map(|(result, config)| {
            annotate_collection(
                result,
                config,
                options.normalize_scores,
                options.normalize_highlights,
            )
        })
        .collect();

    let mut merged = match options.strategy {
        MergeStrategy::Relevance => merge_relevance(per_collection),
        MergeStrategy::RoundRobin => merge_round_robin(per_collection),
        MergeStrategy::CollectionOrder => per_collection.into_iter().flatten().collect(),
    };

    if let Some(cap) = options.global_max_results {
        merged.truncate(cap);
    }
    merged
}

/// Annotate one collection's hits with rank, normalized score, weight, and
/// merged score. With normalization off, the merged score is raw * weight.
pub(crate) fn annotate_collection(
    result: &CollectionResult,
    config: &CollectionQueryConfig,
    normalize_scores: bool,
    normalize_highlights: bool,
) -> Vec<MergedHit> {
    let hits = &result.response.hits;
    let max_score = hits.iter().map(|h| h.score).fold(f32::NEG_INFINITY, f32::max);

    hits.iter()
        .take(config.max_results)
        .enumerate()
        .map(|(i, hit)| {
            let normalized = if !normalize_scores {
                hit.score
            } else if hits.len() == 1 || max_score <= 0.0 {
                // Single hit or degenerate scores: best available signal is
                // "top of its own list".
                1.0
            } else {
                hit.score / max_score
            };

            MergedHit {
                id: hit.id.clone(),
                collection: result.collection.clone(),
                namespace: result.namespace.clone(),
                rank: i + 1,
                raw_score: hit.score,
                normalized_score: normalized,
                weight: config.weight,
                merged_score: normalized * config.weight,
                fields: hit.fields.clone(),
                highlights: if normalize_highlights {
                    normalize_highlight_payload(hit.highlight.as_ref())
                } else {
                    None
                },
            }
        })
        .collect()
}

fn merge_relevance(per_collection: Vec<Vec<MergedHit>>) -> Vec<MergedHit> {
    let mut all: Vec<MergedHit> = per_collection.into_iter().flatten().collect();
    // Stable sort: ties keep (declaration order, in-collection rank).
    all.sort_by(|a, b| {
        b.merged_score
            .partial_cmp(&a.merged_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    all
}

fn merge_round_robin(per_collection: Vec<Vec<MergedHit>>) -> Vec<MergedHit> {
    let total: usize = per_collection.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = per_collection.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::with_capacity(total);

    while out.len() < total {
        for iter in &mut iters {
            // Exhausted collections are skipped without stalling the rotation.
            if let Some(hit) = iter.next() {
                out.push(hit);
            }
        }
    }
    out
}

/// Normalize a backend-native highlight payload into uniform spans.
///
/// Accepts the common shapes:
/// - `[{"field": "title", "snippet": "...", "matched_tokens": [...]}]`
/// - `{"title": ["frag1", "frag2"]}`
/// - `{"title": {"snippet": "..."}}`
fn normalize_highlight_payload(native: Option<&Value>) -> Option<Vec<HighlightSpan>> {
    let native = native?;
    let mut spans = Vec::new();

    match native {
        Value::Array(items) => {
            for item in items {
                // Skip malformed entries rather than dropping the whole payload.
                let Some(obj) = item.as_object() else { continue };
                let Some(field) = obj.get("field").and_then(Value::as_str) else {
                    continue;
                };
                let field = field.to_string();
                let snippet = obj
                    .get("snippet")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let matched_tokens = obj
                    .get("matched_tokens")
                    .and_then(Value::as_array)
                    .map(|tokens| {
                        tokens
                            .iter()
                            .filter_map(Value::as_str)
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default();
                spans.push(HighlightSpan {
                    field,
                    snippet,
                    matched_tokens,
                });
            }
        }
        Value::Object(map) => {
            for (field, payload) in map {
                match payload {
                    Value::Array(fragments) => {
                        for fragment in fragments.iter().filter_map(Value::as_str) {
                            spans.push(HighlightSpan {
                                field: field.clone(),
                                snippet: fragment.to_string(),
                                matched_tokens: Vec::new(),
                            });
                        }
                    }
                    Value::Object(inner) => {
                        if let Some(snippet) = inner.get("snippet").and_then(Value::as_str) {
                            let matched_tokens = inner
                                .get("matched_tokens")
                                .and_then(Value::as_array)
                                .map(|tokens| {
                                    tokens
                                        .iter()
                                        .filter_map(Value::as_str)
                                        .map(String::from)
                                        .collect()
                                })
                                .unwrap_or_default();
                            spans.push(HighlightSpan {
                                field: field.clone(),
                                snippet: snippet.to_string(),
                                matched_tokens,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => return None,
    }

    Some(spans)
}
