//! Caching search gateway and multi-collection aggregation for hosted
//! document-search backends.
//!
//! The remote backend sits behind the [`backend::BackendPort`] trait; the
//! [`gateway::SearchGateway`] memoizes searches and schema lookups in a
//! bounded cache, and the [`aggregate::Aggregator`] fans one query out to
//! several collections, tolerating per-collection failures and merging the
//! successes into one ranked list.

pub mod aggregate;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;

pub use config::GatewayConfig;
pub use error::{Error, Result};
