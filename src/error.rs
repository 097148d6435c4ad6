use crate::backend::SearchRequest;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The remote backend call itself failed (network, auth, server-side).
    /// Always carries the collection name and, for searches, the attempted
    /// request so failures stay diagnosable at the call site.
    #[error("Backend error for collection '{collection}': {reason}")]
    Backend {
        collection: String,
        reason: String,
        request: Option<Box<SearchRequest>>,
    },

    #[error("Schema error for collection '{0}': {1}")]
    Schema(String, String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a lower-layer search failure with its collection and request.
    pub fn backend_search(
        collection: impl Into<String>,
        request: &SearchRequest,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::Backend {
            collection: collection.into(),
            reason: reason.to_string(),
            request: Some(Box::new(request.clone())),
        }
    }

    /// Wrap a lower-layer schema-fetch failure.
    pub fn backend_schema(collection: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Backend {
            collection: collection.into(),
            reason: reason.to_string(),
            request: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
