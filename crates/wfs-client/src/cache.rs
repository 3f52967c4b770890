//! GetFeature response caching.
//!
//! GetFeature is idempotent for a given parameter set, so responses are kept
//! for a configurable TTL keyed by the full request signature. Nothing in the
//! client writes to the server; expiry is the only invalidation needed, but
//! callers that know the data changed can [`invalidate`](ResponseCache::invalidate).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info};

struct CachedResponse {
    body: String,
    stored_at: Instant,
}

/// Hit/miss counters, readable without locking.
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// TTL cache of response bodies keyed by request signature.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
    ttl: Duration,
    stats: CacheStats,
}

impl ResponseCache {
    pub fn new(ttl_secs: u64) -> Self {
        info!(ttl_secs = ttl_secs, "Initializing GetFeature response cache");
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            stats: CacheStats::default(),
        }
    }

    /// Cached body for `key` if present and not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let guard = self.entries.read().await;
        match guard.get(key) {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = key, "GetFeature cache hit");
                Some(cached.body.clone())
            }
            _ => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a body, dropping any entries that have expired.
    pub async fn insert(&self, key: String, body: String) {
        let mut guard = self.entries.write().await;
        let ttl = self.ttl;
        guard.retain(|_, cached| cached.stored_at.elapsed() < ttl);
        guard.insert(
            key,
            CachedResponse {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
        debug!("GetFeature cache invalidated");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }
}
