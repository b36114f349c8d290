//! Unified cache builder for both eviction policies.
//!
//! Provides a single entry point to construct a cache with either policy
//! behind one concrete wrapper type, validating the configuration up
//! front.
//!
//! ## Example
//!
//! ```
//! use freqcache::builder::{CacheBuilder, EvictionPolicy};
//!
//! let cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(*cache.get(&1).unwrap(), "hello");
//!
//! // LFU with a custom eviction factor
//! let cache = CacheBuilder::new(100)
//!     .eviction_factor(0.5)
//!     .build::<u64, String>(EvictionPolicy::Lfu);
//! cache.put(2, "world".to_string());
//! assert_eq!(cache.len(), 1);
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::policy::lfu::{DEFAULT_EVICTION_FACTOR, LfuCache};
use crate::policy::lru::LruCache;
use crate::stats::CacheStats;
use crate::traits::ConcurrentCache;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Frequently Used with batch eviction.
    Lfu,
    /// Least Recently Used, evicting one entry at a time.
    Lru,
}

/// Policy-erased cache wrapper with a consistent API.
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lfu(LfuCache<K, V>),
    Lru(LruCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or overwrites an entry.
    pub fn put(&self, key: K, value: V) {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.put(key, value),
            CacheInner::Lru(lru) => lru.put(key, value),
        }
    }

    /// Looks up a value, updating the policy's eviction bookkeeping.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.get(key),
            CacheInner::Lru(lru) => lru.get(key),
        }
    }

    /// Looks up a value without touching eviction bookkeeping.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.peek(key),
            CacheInner::Lru(lru) => lru.peek(key),
        }
    }

    /// Removes an entry if present; absent keys are silently ignored.
    pub fn evict(&self, key: &K) {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.evict(key),
            CacheInner::Lru(lru) => lru.evict(key),
        }
    }

    /// Checks if a key exists.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.contains(key),
            CacheInner::Lru(lru) => lru.contains(key),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.len(),
            CacheInner::Lru(lru) => lru.len(),
        }
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.capacity(),
            CacheInner::Lru(lru) => lru.capacity(),
        }
    }

    /// Removes all entries.
    pub fn clear(&self) {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.clear(),
            CacheInner::Lru(lru) => lru.clear(),
        }
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        match &self.inner {
            CacheInner::Lfu(lfu) => lfu.stats(),
            CacheInner::Lru(lru) => lru.stats(),
        }
    }
}

impl<K, V> ConcurrentCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    fn put(&self, key: K, value: V) {
        Cache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        Cache::get(self, key)
    }

    fn evict(&self, key: &K) {
        Cache::evict(self, key);
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }

    fn clear(&self) {
        Cache::clear(self);
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    eviction_factor: f64,
}

impl CacheBuilder {
    /// Creates a builder for a cache bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            eviction_factor: DEFAULT_EVICTION_FACTOR,
        }
    }

    /// Sets the fraction of capacity an LFU eviction pass retains.
    /// Ignored by the LRU policy, which always evicts one entry at a time.
    pub fn eviction_factor(mut self, eviction_factor: f64) -> Self {
        self.eviction_factor = eviction_factor;
        self
    }

    /// Builds a cache with the chosen policy, validating the
    /// configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// let ok = CacheBuilder::new(10).try_build::<u64, u64>(EvictionPolicy::Lfu);
    /// assert!(ok.is_ok());
    ///
    /// let bad = CacheBuilder::new(0).try_build::<u64, u64>(EvictionPolicy::Lfu);
    /// assert!(bad.is_err());
    ///
    /// let bad = CacheBuilder::new(10)
    ///     .eviction_factor(2.0)
    ///     .try_build::<u64, u64>(EvictionPolicy::Lfu);
    /// assert!(bad.is_err());
    /// ```
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lfu => CacheInner::Lfu(LfuCache::try_with_eviction_factor(
                self.capacity,
                self.eviction_factor,
            )?),
            EvictionPolicy::Lru => CacheInner::Lru(LruCache::try_new(self.capacity)?),
        };
        Ok(Cache { inner })
    }

    /// Builds a cache with the chosen policy.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. See
    /// [`try_build`](Self::try_build).
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build(policy) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_policies_basic_ops() {
        for policy in [EvictionPolicy::Lfu, EvictionPolicy::Lru] {
            let cache = CacheBuilder::new(10).build::<u64, String>(policy);

            cache.put(1, "one".to_string());
            cache.put(2, "two".to_string());

            assert_eq!(*cache.get(&1).unwrap(), "one");
            assert_eq!(*cache.get(&2).unwrap(), "two");
            assert!(cache.get(&3).is_none());

            assert!(cache.contains(&1));
            assert!(!cache.contains(&99));

            assert_eq!(cache.len(), 2);
            assert!(!cache.is_empty());
            assert_eq!(cache.capacity(), 10);

            cache.put(1, "ONE".to_string());
            assert_eq!(*cache.get(&1).unwrap(), "ONE");
            assert_eq!(cache.len(), 2);

            cache.evict(&2);
            assert!(!cache.contains(&2));
            cache.evict(&2); // idempotent

            cache.clear();
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn test_capacity_enforcement() {
        for policy in [EvictionPolicy::Lfu, EvictionPolicy::Lru] {
            let cache = CacheBuilder::new(2)
                .eviction_factor(0.5)
                .build::<u64, String>(policy);

            for key in 0..20 {
                cache.put(key, format!("value_{key}"));
                assert!(cache.len() <= 2);
            }
        }
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(CacheBuilder::new(0).try_build::<u64, u64>(EvictionPolicy::Lfu).is_err());
        assert!(CacheBuilder::new(0).try_build::<u64, u64>(EvictionPolicy::Lru).is_err());
        assert!(
            CacheBuilder::new(10)
                .eviction_factor(0.0)
                .try_build::<u64, u64>(EvictionPolicy::Lfu)
                .is_err()
        );

        // the factor is an LFU knob; LRU ignores it
        assert!(
            CacheBuilder::new(10)
                .eviction_factor(0.0)
                .try_build::<u64, u64>(EvictionPolicy::Lru)
                .is_ok()
        );
    }

    #[test]
    #[should_panic(expected = "invalid cache configuration")]
    fn test_build_panics_on_invalid_configuration() {
        let _ = CacheBuilder::new(0).build::<u64, u64>(EvictionPolicy::Lfu);
    }

    #[test]
    fn test_stats_pass_through() {
        let cache = CacheBuilder::new(4).build::<u64, u64>(EvictionPolicy::Lfu);
        cache.put(1, 1);
        cache.get(&1);
        cache.get(&2);

        let stats = cache.stats();
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
