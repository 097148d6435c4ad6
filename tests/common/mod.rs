#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use refract::backend::{
    BackendPort, FacetCount, FacetValue, FieldType, Hit, ResponseEnvelope, Schema, SchemaField,
    SearchRequest,
};
use refract::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Route crate logs through a test subscriber so failures can be debugged
/// with `RUST_LOG=refract=debug cargo test`. Safe to call from every test;
/// only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Programmable in-memory backend for gateway/aggregation tests.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<HashMap<String, ResponseEnvelope>>,
    schemas: Mutex<HashMap<String, Schema>>,
    failing: Mutex<HashSet<String>>,
    search_calls: AtomicUsize,
    schema_calls: AtomicUsize,
    last_requests: Mutex<HashMap<String, SearchRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, collection: &str, envelope: ResponseEnvelope) -> Self {
        self.responses.lock().insert(collection.to_string(), envelope);
        self
    }

    pub fn with_schema(self, collection: &str, schema: Schema) -> Self {
        self.schemas.lock().insert(collection.to_string(), schema);
        self
    }

    pub fn with_failing(self, collection: &str) -> Self {
        self.failing.lock().insert(collection.to_string());
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    /// The most recent request seen for a collection.
    pub fn last_request(&self, collection: &str) -> Option<SearchRequest> {
        self.last_requests.lock().get(collection).cloned()
    }
}

#[async_trait]
impl BackendPort for MockBackend {
    async fn execute_search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<ResponseEnvelope> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.last_requests
            .lock()
            .insert(collection.to_string(), request.clone());

        if self.failing.lock().contains(collection) {
            return Err(Error::Backend {
                collection: collection.to_string(),
                reason: "simulated outage".to_string(),
                request: None,
            });
        }

        Ok(self
            .responses
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_else(empty_envelope))
    }

    async fn fetch_schema(&self, collection: &str) -> Result<Schema> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().contains(collection) {
            return Err(Error::Backend {
                collection: collection.to_string(),
                reason: "simulated outage".to_string(),
                request: None,
            });
        }

        self.schemas
            .lock()
            .get(collection)
            .cloned()
            .ok_or_else(|| Error::Schema(collection.to_string(), "no schema registered".into()))
    }
}

pub fn empty_envelope() -> ResponseEnvelope {
    ResponseEnvelope {
        hits: vec![],
        found: 0,
        facet_counts: vec![],
        search_time_ms: 1,
    }
}

/// Envelope with one hit per (id, score) pair, in order.
pub fn envelope(hits: &[(&str, f32)]) -> ResponseEnvelope {
    ResponseEnvelope {
        hits: hits
            .iter()
            .map(|(id, score)| Hit {
                id: id.to_string(),
                score: *score,
                fields: HashMap::new(),
                highlight: None,
            })
            .collect(),
        found: hits.len() as u64,
        facet_counts: vec![],
        search_time_ms: 2,
    }
}

pub fn envelope_with_facets(hits: &[(&str, f32)], facet_field: &str) -> ResponseEnvelope {
    let mut env = envelope(hits);
    env.facet_counts = vec![FacetCount {
        field: facet_field.to_string(),
        counts: vec![
            FacetValue {
                value: "red".to_string(),
                count: 3,
            },
            FacetValue {
                value: "blue".to_string(),
                count: 1,
            },
        ],
    }];
    env
}

/// Schema with string `title`/`body`, non-string `price`, and a default
/// sorting field.
pub fn schema(name: &str) -> Schema {
    Schema {
        name: name.to_string(),
        fields: vec![
            SchemaField::new("title", FieldType::String),
            SchemaField::new("body", FieldType::String),
            SchemaField::new("price", FieldType::Float),
        ],
        default_sorting_field: Some("popularity".to_string()),
    }
}
