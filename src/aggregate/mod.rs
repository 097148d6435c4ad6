//! Multi-collection aggregation
//!
//! Fans one logical query out to several backend collections concurrently,
//! merges the heterogeneous result sets into one ranked sequence, and
//! reports per-collection failures without failing the overall call.
//!
//! ```text
//! Query → [collection 1, collection 2, ...] → Merger → AggregateResponse
//!                  ↓
//!       parallel branches, failures captured per collection
//! ```

pub mod merger;
pub mod planner;
mod types;

pub use merger::{MergeOptions, MergeStrategy};
pub use planner::{needs_schema, resolve, ResolvedQuery};
pub use types::{
    AggregateOptions, AggregateResponse, CollectionQueryConfig, CollectionResult,
    CollectionSummary, HighlightSpan, MergedHit, ResultMode,
};

use crate::backend::{Schema, SearchRequest};
use crate::gateway::SearchGateway;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Orchestrates schema resolution, fan-out, and merging across collections.
///
/// Owns a schema cache keyed by collection name that outlives individual
/// aggregation calls; the gateway's result cache is shared with it but
/// cleared independently.
pub struct Aggregator {
    gateway: Arc<SearchGateway>,
    schema_cache: RwLock<HashMap<String, Arc<Schema>>>,
}

impl Aggregator {
    pub fn new(gateway: Arc<SearchGateway>) -> Self {
        Self {
            gateway,
            schema_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Run one aggregation call.
    ///
    /// Every configured collection ends up either in the response's
    /// `collections` or in `errors_by_collection`; a branch failure never
    /// fails or cancels its siblings. The only whole-call error is a
    /// configuration one: zero collections supplied.
    pub async fn aggregate(
        &self,
        query: &str,
        configs: &[CollectionQueryConfig],
        options: &AggregateOptions,
    ) -> Result<AggregateResponse> {
        if configs.is_empty() {
            return Err(Error::Config(
                "at least one collection must be configured".to_string(),
            ));
        }

        let start = Instant::now();

        // Branches are joined in place, not spawned: dropping this future
        // cancels all of them, while join_all still waits for every branch
        // to settle before merging.
        let branches = configs
            .iter()
            .map(|config| self.run_branch(query, config, options));
        let settled = futures::future::join_all(branches).await;

        let mut results: Vec<CollectionResult> = Vec::with_capacity(configs.len());
        let mut result_configs: Vec<CollectionQueryConfig> = Vec::with_capacity(configs.len());
        let mut errors_by_collection = HashMap::new();

        for (config, outcome) in configs.iter().zip(settled) {
            match outcome {
                Ok(result) => {
                    debug!(
                        collection = %result.collection,
                        hits = result.response.hits.len(),
                        found = result.response.found,
                        elapsed_ms = result.elapsed_ms,
                        "collection branch succeeded"
                    );
                    results.push(result);
                    result_configs.push(config.clone());
                }
                Err(e) => {
                    warn!(collection = %config.collection, error = %e, "collection branch failed");
                    errors_by_collection.insert(config.collection.clone(), e.to_string());
                }
            }
        }

        let merge_options = MergeOptions {
            strategy: options.merge_strategy,
            normalize_scores: options.normalize_scores,
            global_max_results: options.global_max_results,
            normalize_highlights: options.enable_highlighting,
        };

        let hits = options
            .result_mode
            .includes_interleaved()
            .then(|| merger::merge(&results, &result_configs, &merge_options));

        let collections = results
            .iter()
            .zip(result_configs.iter())
            .map(|(result, config)| {
                let included = result.response.hits.len().min(config.max_results);
                CollectionSummary {
                    collection: result.collection.clone(),
                    namespace: result.namespace.clone(),
                    found: result.response.found,
                    included,
                    elapsed_ms: result.elapsed_ms,
                    facet_counts: if config.facet_by.is_some() {
                        result.response.facet_counts.clone()
                    } else {
                        Vec::new()
                    },
                    hits: options.result_mode.includes_per_collection().then(|| {
                        merger::annotate_collection(
                            result,
                            config,
                            options.normalize_scores,
                            options.enable_highlighting,
                        )
                    }),
                }
            })
            .collect();

        Ok(AggregateResponse {
            hits,
            collections,
            errors_by_collection,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// One collection's branch: resolve fields (fetching the schema if
    /// needed), then search through the gateway.
    async fn run_branch(
        &self,
        query: &str,
        config: &CollectionQueryConfig,
        options: &AggregateOptions,
    ) -> Result<CollectionResult> {
        let start = Instant::now();

        let schema = if planner::needs_schema(config) {
            Some(self.schema(&config.collection).await?)
        } else {
            None
        };
        let resolved = planner::resolve(config, schema.as_deref());

        let request = SearchRequest {
            query: query.to_string(),
            query_by: resolved.query_by,
            filter_by: config.filter_by.clone(),
            sort_by: resolved.sort_by,
            facet_by: config.facet_by.clone().unwrap_or_default(),
            page: Some(1),
            per_page: Some(config.max_results as u32),
            include_fields: config.include_fields.clone(),
            exclude_fields: config.exclude_fields.clone(),
            highlight: options
                .enable_highlighting
                .then(|| options.highlight.clone()),
            extra: config.extra.clone(),
        };

        let response = self
            .gateway
            .search(&config.collection, &request, options.use_cache)
            .await?;

        Ok(CollectionResult {
            collection: config.collection.clone(),
            namespace: config.namespace.clone(),
            response,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Schema lookup with the aggregator-level cache in front of the
    /// gateway's shared result cache.
    async fn schema(&self, collection: &str) -> Result<Arc<Schema>> {
        if let Some(schema) = self.schema_cache.read().get(collection) {
            return Ok(Arc::clone(schema));
        }

        let schema = self.gateway.schema(collection).await?;
        self.schema_cache
            .write()
            .insert(collection.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Reset only the aggregator's schema cache; the gateway's result cache
    /// is untouched.
    pub fn clear_schema_cache(&self) {
        self.schema_cache.write().clear();
    }

    pub fn gateway(&self) -> &Arc<SearchGateway> {
        &self.gateway
    }
}
