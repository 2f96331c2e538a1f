//! Process-scoped memoization cache for synthesized queries.
//!
//! Bounded LRU mapping of (sanitized question, result limit) to the model's
//! raw output. Values are never normalized statements: normalization re-runs
//! on every hit. The cache carries no per-session data, so one instance can
//! back every active session.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use lru::LruCache;
use tokio::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 100;

/// Cache key. Keyed on post-sanitization text, so differently-worded raw
/// inputs that sanitize identically share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub question: String,
    pub result_limit: u32,
}

impl QueryKey {
    pub fn new(question: &str, result_limit: u32) -> Self {
        Self {
            question: question.to_string(),
            result_limit,
        }
    }
}

/// Hit/miss counters, cumulative since process start.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Bounded LRU cache over raw synthesizer output, injectable by handle.
pub struct QueryCache {
    entries: Mutex<LruCache<QueryKey, String>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl QueryCache {
    /// A zero capacity is clamped to one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Look up a key, marking it most-recently-used on a hit.
    pub async fn get(&self, key: &QueryKey) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(raw) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(raw.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert raw synthesizer output, evicting the least-recently-used entry
    /// once capacity is exceeded.
    pub async fn insert(&self, key: QueryKey, raw_query: String) {
        self.entries.lock().await.put(key, raw_query);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Basic Mapping =====

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = QueryCache::new(10);
        let key = QueryKey::new("students in class 5", 5);
        cache.insert(key.clone(), "SELECT 1".to_string()).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some("SELECT 1"));
    }

    #[tokio::test]
    async fn test_limit_is_part_of_the_key() {
        let cache = QueryCache::new(10);
        cache
            .insert(QueryKey::new("students", 5), "SELECT a".to_string())
            .await;
        assert!(cache.get(&QueryKey::new("students", 10)).await.is_none());
    }

    // ===== Eviction =====

    #[tokio::test]
    async fn test_evicts_least_recently_used_at_capacity() {
        let cache = QueryCache::new(2);
        cache.insert(QueryKey::new("a", 5), "qa".into()).await;
        cache.insert(QueryKey::new("b", 5), "qb".into()).await;
        // Touch "a" so "b" is now least-recently-used.
        assert!(cache.get(&QueryKey::new("a", 5)).await.is_some());
        cache.insert(QueryKey::new("c", 5), "qc".into()).await;

        assert!(cache.get(&QueryKey::new("a", 5)).await.is_some());
        assert!(cache.get(&QueryKey::new("b", 5)).await.is_none());
        assert!(cache.get(&QueryKey::new("c", 5)).await.is_some());
    }

    #[tokio::test]
    async fn test_hundred_and_first_key_evicts_the_oldest() {
        let cache = QueryCache::new(DEFAULT_CAPACITY);
        for i in 0..100 {
            cache
                .insert(QueryKey::new(&format!("q{}", i), 5), format!("sql{}", i))
                .await;
        }
        assert_eq!(cache.len().await, 100);

        cache.insert(QueryKey::new("q100", 5), "sql100".into()).await;
        assert_eq!(cache.len().await, 100);
        assert!(cache.get(&QueryKey::new("q0", 5)).await.is_none());
        assert!(cache.get(&QueryKey::new("q1", 5)).await.is_some());
        assert!(cache.get(&QueryKey::new("q100", 5)).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_clamped_to_one() {
        let cache = QueryCache::new(0);
        cache.insert(QueryKey::new("a", 5), "qa".into()).await;
        assert_eq!(cache.len().await, 1);
    }

    // ===== Stats =====

    #[tokio::test]
    async fn test_stats_count_hits_and_misses() {
        let cache = QueryCache::new(10);
        let key = QueryKey::new("a", 5);
        assert!(cache.get(&key).await.is_none());
        cache.insert(key.clone(), "qa".into()).await;
        assert!(cache.get(&key).await.is_some());
        assert!(cache.get(&key).await.is_some());

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }
}
