//! Response cache with per-class TTLs.
//!
//! Entries are keyed by a hash of the endpoint and its sorted query
//! parameters, so parameter order never causes a miss. Expired entries are
//! dropped lazily when they are read.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Freshness class of a cached response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    Profile,
    Search,
    Repository,
    /// Never cached.
    Uncached,
}

impl CacheClass {
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            CacheClass::Profile => Some(Duration::from_secs(600)),
            CacheClass::Search => Some(Duration::from_secs(300)),
            CacheClass::Repository => Some(Duration::from_secs(300)),
            CacheClass::Uncached => None,
        }
    }
}

/// Hash of an endpoint plus its parameters in sorted order.
pub fn cache_key(endpoint: &str, params: &[(String, String)]) -> u64 {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut hasher = DefaultHasher::new();
    endpoint.hash(&mut hasher);
    sorted.hash(&mut hasher);
    hasher.finish()
}

struct CacheEntry {
    value: String,
    written_at: Instant,
}

/// Shared in-memory response cache.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value for `key`, evicting it if it has outlived the class TTL.
    pub fn get(&self, key: u64, class: CacheClass) -> Option<String> {
        let ttl = class.ttl()?;
        let mut entries = self.entries.lock();

        let entry = entries.get(&key)?;
        if entry.written_at.elapsed() < ttl {
            return Some(entry.value.clone());
        }

        debug!(key, "Evicting expired cache entry");
        entries.remove(&key);
        None
    }

    pub fn insert(&self, key: u64, value: String) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                written_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_key_ignores_param_order() {
        let a = cache_key("/search/users", &params(&[("q", "rust"), ("page", "2")]));
        let b = cache_key("/search/users", &params(&[("page", "2"), ("q", "rust")]));
        let c = cache_key("/search/users", &params(&[("page", "3"), ("q", "rust")]));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uncached_class_never_hits() {
        let cache = ResponseCache::new();
        cache.insert(1, "body".to_string());
        assert_eq!(cache.get(1, CacheClass::Uncached), None);
        assert_eq!(cache.get(1, CacheClass::Profile), Some("body".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new();
        cache.insert(7, "profile".to_string());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get(7, CacheClass::Search).is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(7, CacheClass::Search).is_none());
        assert!(cache.is_empty());
    }
}
