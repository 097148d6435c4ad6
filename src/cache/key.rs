//! Cache key derivation
//!
//! Two semantically identical requests must land on the same entry, so keys
//! are derived from a canonical serialization of the request rather than
//! from whatever property order the caller happened to build it with.

use crate::backend::SearchRequest;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Key for a search-response entry: collection plus a digest of the
/// canonicalized request. The collection name stays in the clear so keys
/// remain debuggable in logs.
pub fn search_key(collection: &str, request: &SearchRequest) -> String {
    // Serializing a just-built SearchRequest cannot fail; fall back to the
    // Debug form rather than panicking if it ever does.
    let canonical = serde_json::to_value(request)
        .map(|v| canonical_json(&v))
        .unwrap_or_else(|_| format!("{:?}", request));
    format!("search:{}:{}", collection, hex_hash(&canonical))
}

/// Key for a schema entry, keyed purely by collection name.
pub fn schema_key(collection: &str) -> String {
    format!("schema:{}", collection)
}

/// Render a JSON value with object keys recursively sorted. Array order is
/// preserved: arrays here are order-significant (query_by carries field
/// priority, sort expressions are positional).
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", k, canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", inner.join(","))
        }
        other => other.to_string(),
    }
}

fn hex_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
