//! Time-based response cache.
//!
//! Memoizes upstream JSON responses keyed by the exact request URL string.
//! Entries expire after a fixed TTL and are evicted lazily on the next
//! lookup for that key; there is no background sweep.

use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default time-to-live for cached upstream responses.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// A single cached upstream response.
#[derive(Debug, Clone)]
struct CacheEntry {
    expires_at: Instant,
    value: Value,
}

/// Shared in-memory TTL cache for upstream JSON responses.
///
/// Keys are exact URL strings, query string included. No normalization of
/// equivalent URLs is performed, so e.g. the same query parameters in a
/// different order cache independently. That is a documented limitation,
/// not something callers should try to compensate for.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    /// Create a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `url`, lazily evicting an expired entry.
    ///
    /// Returns the stored value only while `now < expires_at`.
    pub async fn get(&self, url: &str) -> Option<Value> {
        {
            let entries = self.entries.read().await;
            match entries.get(url) {
                Some(entry) if Instant::now() < entry.expires_at => {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired; drop it under the write lock below
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(url) {
            // A concurrent writer may have refreshed the entry between locks.
            if Instant::now() < entry.expires_at {
                return Some(entry.value.clone());
            }
            entries.remove(url);
        }
        None
    }

    /// Store `value` under `url`, replacing any previous entry.
    pub async fn insert(&self, url: impl Into<String>, value: Value) {
        let entry = CacheEntry {
            expires_at: Instant::now() + self.ttl,
            value,
        };
        self.entries.write().await.insert(url.into(), entry);
    }

    /// Drop every entry. Test/reset hook; never called on the request path.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
