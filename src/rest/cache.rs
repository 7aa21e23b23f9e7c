//! In-memory response cache with per-entry TTL.
//!
//! Responses are stored as decoded JSON bodies keyed by [`CacheKey`]. The
//! cache never refreshes anything on its own: entries are checked for expiry
//! when they are read, and an expired entry is evicted at that moment and
//! reported as a miss (lazy expiry).
//!
//! ## Cache keys
//!
//! A key is structured rather than a delimited string:
//!
//! - **method**: always `GET` today.
//! - **endpoint**: the endpoint name (`"artworks"`, `"artworks/:id"`).
//!   Invalidation compares this field for equality, so invalidating
//!   `"items"` can never touch `"items/:id"`.
//! - **discriminator**: either the normalized-JSON rendering of the request
//!   parameters or a caller-supplied override key.
//!
//! ## Concurrency
//!
//! All access goes through one mutex, so the expiry check, the eviction and a
//! subsequent insert for the same key are never interleaved with another
//! task's read of that key.
//!
//! Timestamps use `tokio::time::Instant`, which follows tokio's paused test
//! clock.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use super::params::normalized_json;

/// Identity of a cached response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: &'static str,
    endpoint: String,
    discriminator: KeyDiscriminator,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyDiscriminator {
    Params(String),
    Override(String),
}

impl CacheKey {
    /// Key derived from the request parameters.
    pub fn from_params(method: &'static str, endpoint: &str, params: &Value) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            discriminator: KeyDiscriminator::Params(normalized_json(params)),
        }
    }

    /// Caller-chosen key, still scoped to its endpoint for invalidation.
    pub fn from_override(method: &'static str, endpoint: &str, key: &str) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            discriminator: KeyDiscriminator::Override(key.to_string()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.discriminator {
            KeyDiscriminator::Params(params) => {
                write!(f, "{}:{}:{}", self.method, self.endpoint, params)
            }
            KeyDiscriminator::Override(key) => f.write_str(key),
        }
    }
}

/// A stored response body.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(data: Value, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is fresh while `now - created_at <= ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

/// Counters for cache behaviour over the lifetime of a client.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub stored: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lookups() == 0 {
            return write!(f, "no cached lookups ({} entries)", self.entries);
        }
        write!(f, "{} hits, {} misses", self.hits, self.misses)?;
        if self.expired > 0 {
            write!(f, " ({} expired)", self.expired)?;
        }
        write!(f, ", {} entries", self.entries)
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    stats: CacheStats,
}

/// Thread-safe map from [`CacheKey`] to response body.
#[derive(Default)]
pub struct ResponseCache {
    state: Mutex<CacheState>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fresh entry's body, evicting it instead if it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = Instant::now();

        let expired = match state.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                state.stats.hits += 1;
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.remove(key);
            state.stats.expired += 1;
            tracing::debug!(%key, "cache entry expired");
        }
        state.stats.misses += 1;
        None
    }

    /// Store a body under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, data: Value, ttl: Duration) {
        let mut state = self.state.lock();
        state.entries.insert(key, CacheEntry::new(data, ttl));
        state.stats.stored += 1;
    }

    /// Remove every entry whose endpoint is exactly `endpoint`.
    ///
    /// Returns the number of removed entries.
    pub fn invalidate(&self, endpoint: &str) -> usize {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| key.endpoint() != endpoint);
        before - state.entries.len()
    }

    /// Remove every entry. Returns the number of removed entries.
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let removed = state.entries.len();
        state.entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            ..state.stats
        }
    }
}
