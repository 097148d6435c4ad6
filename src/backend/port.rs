use crate::backend::types::{ResponseEnvelope, Schema, SearchRequest};
use crate::Result;
use async_trait::async_trait;

/// Capability to execute searches and schema lookups against the remote
/// search backend. Implementations own transport, auth, and per-call
/// timeout/retry policy; this crate never issues HTTP itself.
#[async_trait]
pub trait BackendPort: Send + Sync {
    /// Execute a single search against one named collection.
    async fn execute_search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<ResponseEnvelope>;

    /// Fetch a collection's declared field schema.
    async fn fetch_schema(&self, collection: &str) -> Result<Schema>;
}
