//! Request memoization for the search gateway
//!
//! A bounded, time-and-size-limited memo store keyed by collection plus a
//! canonicalized request serialization. Volatile and in-process; never
//! persisted.

mod key;
mod result;
mod stats;

pub use key::{schema_key, search_key};
pub use result::{CacheInfo, CachedValue, ResultCache};
pub use stats::CacheCounters;

use serde::{Deserialize, Serialize};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in milliseconds (default: 5 minutes)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum resident entries before oldest-inserted eviction
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_timeout_ms() -> u64 {
    300_000
}

fn default_max_entries() -> usize {
    100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_entries: default_max_entries(),
        }
    }
}
