//! Caching search gateway
//!
//! Wraps a [`BackendPort`] with opt-in request memoization. Only successful
//! responses are cached; failures are rewrapped with the collection and the
//! attempted request and propagated to the caller.

use crate::backend::{BackendPort, ResponseEnvelope, Schema, SearchRequest};
use crate::cache::{schema_key, search_key, CacheConfig, CacheInfo, CachedValue, ResultCache};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::debug;

pub struct SearchGateway {
    port: Arc<dyn BackendPort>,
    cache: ResultCache,
}

impl SearchGateway {
    pub fn new(port: Arc<dyn BackendPort>, config: &CacheConfig) -> Self {
        Self {
            port,
            cache: ResultCache::new(config),
        }
    }

    /// Execute one search, consulting the cache first unless `use_cache` is
    /// false. A live cached entry short-circuits the backend entirely.
    pub async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
        use_cache: bool,
    ) -> Result<Arc<ResponseEnvelope>> {
        let key = search_key(collection, request);

        if use_cache {
            if let Some(CachedValue::Search(envelope)) = self.cache.get(&key) {
                debug!(collection, key = %key, "search cache hit");
                return Ok(envelope);
            }
            debug!(collection, key = %key, "search cache miss");
        }

        let envelope = self
            .port
            .execute_search(collection, request)
            .await
            .map_err(|e| Error::backend_search(collection, request, e))?;

        let envelope = Arc::new(envelope);
        if use_cache {
            self.cache
                .put(&key, CachedValue::Search(Arc::clone(&envelope)));
        }
        Ok(envelope)
    }

    /// Issue several same-collection searches concurrently (used for
    /// disjunctive facet queries). Unlike aggregation, this is not a
    /// failure-isolation boundary: the first failing member fails the whole
    /// batch and the outstanding members are dropped.
    pub async fn batch_search(
        &self,
        collection: &str,
        requests: &[SearchRequest],
        use_cache: bool,
    ) -> Result<Vec<Arc<ResponseEnvelope>>> {
        let calls = requests
            .iter()
            .map(|request| self.search(collection, request, use_cache));
        futures::future::try_join_all(calls).await
    }

    /// Fetch a collection's schema, keyed purely by collection name. Schema
    /// entries live in the same cache as search responses and share its
    /// timeout and eviction policy.
    pub async fn schema(&self, collection: &str) -> Result<Arc<Schema>> {
        let key = schema_key(collection);

        if let Some(CachedValue::Schema(schema)) = self.cache.get(&key) {
            debug!(collection, "schema cache hit");
            return Ok(schema);
        }

        let schema = self
            .port
            .fetch_schema(collection)
            .await
            .map_err(|e| Error::backend_schema(collection, e))?;

        let schema = Arc::new(schema);
        self.cache
            .put(&key, CachedValue::Schema(Arc::clone(&schema)));
        Ok(schema)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheInfo {
        self.cache.info()
    }
}
