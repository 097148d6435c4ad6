//! Default query/sort field resolution
//!
//! Pure schema inspection, no I/O. Decides which fields a collection search
//! runs over when the caller did not say explicitly.

use crate::aggregate::types::CollectionQueryConfig;
use crate::backend::Schema;

/// Query fields and sort expression actually sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub query_by: Vec<String>,
    pub sort_by: Option<String>,
}

/// Whether resolving this config requires the collection schema at all.
pub fn needs_schema(config: &CollectionQueryConfig) -> bool {
    config.query_by.is_none() || config.sort_by.is_none()
}

/// Resolve query fields and sort for one collection.
///
/// Explicit caller choices pass through unchanged. Otherwise query fields
/// default to every indexed string / string-array field in the schema, and
/// sort falls back to the schema's declared default sorting field, or to
/// pure relevance when the schema declares none.
pub fn resolve(config: &CollectionQueryConfig, schema: Option<&Schema>) -> ResolvedQuery {
    let query_by = match &config.query_by {
        Some(fields) => fields.clone(),
        None => schema
            .map(|s| {
                s.fields
                    .iter()
                    .filter(|f| f.indexed && f.field_type.is_string())
                    .map(|f| f.name.clone())
                    .collect()
            })
            .unwrap_or_default(),
    };

    let sort_by = match &config.sort_by {
        Some(sort) => Some(sort.clone()),
        None => schema.and_then(|s| s.default_sorting_field.clone()),
    };

    ResolvedQuery { query_by, sort_by }
}
