//! Bounded memo table for backend responses
//!
//! Purely a memoization layer: never calls the backend and a miss is not an
//! error. Entries expire lazily on lookup once older
//! than the configured timeout, and inserting a new key at capacity evicts
//! the oldest-inserted surviving entry first.

use crate::backend::{ResponseEnvelope, Schema};
use crate::cache::stats::CacheCounters;
use crate::cache::CacheConfig;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// A cached backend response. Search responses and schemas share one table
/// (and therefore one timeout and one eviction policy).
#[derive(Debug, Clone)]
pub enum CachedValue {
    Search(Arc<ResponseEnvelope>),
    Schema(Arc<Schema>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order. Kept in lockstep with `entries`: expiry on
    /// lookup, eviction, and clear all remove the key from both.
    insertion_order: VecDeque<String>,
}

/// Point-in-time view of the cache, for callers and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInfo {
    pub size: usize,
    pub max_entries: usize,
    pub timeout_ms: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded, time-limited memo store shared by all in-flight searches.
pub struct ResultCache {
    inner: Mutex<CacheInner>,
    timeout: Duration,
    max_entries: usize,
    counters: Arc<CacheCounters>,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            timeout: Duration::from_millis(config.timeout_ms),
            max_entries: config.max_entries,
            counters: Arc::new(CacheCounters::new()),
        }
    }

    pub fn counters(&self) -> Arc<CacheCounters> {
        Arc::clone(&self.counters)
    }

    /// Look up a live entry. An entry past the timeout is removed and
    /// reported as a miss.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.timeout => {
                self.counters.hit();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(key);
            if let Some(pos) = inner.insertion_order.iter().position(|k| k == key) {
                inner.insertion_order.remove(pos);
            }
            self.counters.expire();
        }
        self.counters.miss();
        None
    }

    /// Insert or replace an entry. Replacing an existing key keeps its
    /// insertion position and does not count against capacity.
    pub fn put(&self, key: &str, value: CachedValue) {
        let mut inner = self.inner.lock();

        if let Some(entry) = inner.entries.get_mut(key) {
            entry.value = value;
            entry.stored_at = Instant::now();
            return;
        }

        if inner.entries.len() >= self.max_entries {
            Self::evict_oldest(&mut inner, &self.counters);
        }

        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        inner.insertion_order.push_back(key.to_string());
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            size: self.len(),
            max_entries: self.max_entries,
            timeout_ms: self.timeout.as_millis() as u64,
            hits: self.counters.hits(),
            misses: self.counters.misses(),
            evictions: self.counters.evictions(),
        }
    }

    /// Remove the oldest-inserted key that is still resident. The order
    /// queue normally mirrors the map exactly; a key missing from the map is
    /// dropped from the queue without counting as an eviction.
    fn evict_oldest(inner: &mut CacheInner, counters: &CacheCounters) {
        while let Some(key) = inner.insertion_order.pop_front() {
            if inner.entries.remove(&key).is_some() {
                warn!(key = %key, "cache at capacity, evicting oldest entry");
                counters.evict();
                return;
            }
        }
    }
}
