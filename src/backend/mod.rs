//! Boundary types for the remote search backend.
//!
//! The backend itself (transport, auth, retries) lives behind the
//! [`BackendPort`] trait; this crate only consumes it.

mod port;
mod types;

pub use port::BackendPort;
pub use types::{
    FacetCount, FacetValue, FieldType, HighlightRequest, Hit, ResponseEnvelope, Schema,
    SchemaField, SearchRequest,
};
