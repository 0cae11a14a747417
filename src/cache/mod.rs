//! Key/value cache for fetched API payloads.
//!
//! Entries carry an absolute expiry; an expired entry is indistinguishable
//! from a missing one. There is no single-flight guard: two requests that
//! miss the same key at the same time will both fetch upstream and the last
//! write wins.

/// Typed bookkeeping of the last upstream attempt
pub mod status;

pub use status::{FetchStatus, FetchStatusLog};

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};

/// A cached resource: the raw list of records as returned by the API.
pub type Payload = Vec<Value>;

/// Storage for resource payloads with per-key time-to-live.
///
/// Each operation is atomic for its key; there are no multi-key transactions.
pub trait CacheStore: Send + Sync {
    /// Return the value stored under `key` unless it is missing or expired.
    fn get(&self, key: &str) -> Option<Payload>;

    /// Store `value` under `key`, visible for `ttl`.
    fn set(&self, key: &str, value: Payload, ttl: Duration);

    /// Remove `key` if present.
    fn delete(&self, key: &str);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Payload,
    expires_at: DateTime<Utc>,
}

/// In-process cache backed by a `HashMap`.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create an empty cache on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries currently stored, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Payload> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: Payload, ttl: Duration) {
        let expires_at = self.clock.now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), CacheEntry { value, expires_at });
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}
