use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::geocode::GeoLocation;

const GEO_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Thread-safe map whose entries expire after a fixed TTL
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Live value for `key`; an expired entry is evicted on the way out
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.data.remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let before = self.data.len();
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.data.len())
    }

    /// Entry count, expired entries included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Geocoding results keyed by normalized query
pub type GeoCache = Arc<TtlCache<String, GeoLocation>>;

pub fn create_geo_cache() -> GeoCache {
    Arc::new(TtlCache::new(GEO_CACHE_TTL))
}

/// Lowercased, trimmed query used as the cache key
pub fn normalize_cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Spawn a background task that evicts expired geocoding entries hourly
pub fn start_cache_cleanup_task(cache: GeoCache) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = cache.cleanup();
            if removed > 0 {
                tracing::debug!(
                    removed,
                    remaining = cache.len(),
                    "Geocoding cache cleanup completed"
                );
            }
        }
    })
}
