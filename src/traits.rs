//! Shared contract for the concurrent cache policies.
//!
//! Both eviction policies expose the same externally-visible surface and
//! differ only in which entry they give up when full:
//!
//! | Policy                                        | Eviction basis            | Victim                                   |
//! |-----------------------------------------------|---------------------------|------------------------------------------|
//! | [`LfuCache`](crate::policy::lfu::LfuCache)    | access frequency          | lowest count, oldest arrival among ties  |
//! | [`LruCache`](crate::policy::lru::LruCache)    | recency of access         | least recently used                      |
//!
//! Every method takes `&self`: implementations synchronize internally, so
//! a cache can be shared across threads behind a plain `Arc`. Values are
//! handed out as `Arc<V>` clones, never as references into the locked
//! state.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::policy::lru::LruCache;
//! use freqcache::traits::ConcurrentCache;
//!
//! fn warm<C: ConcurrentCache<u64, String>>(cache: &C) {
//!     for key in 0..3 {
//!         cache.put(key, format!("value_{key}"));
//!     }
//! }
//!
//! let lfu = LfuCache::new(10);
//! let lru = LruCache::new(10);
//! warm(&lfu);
//! warm(&lru);
//! assert_eq!(lfu.len(), 3);
//! assert_eq!(lru.len(), 3);
//!
//! // also usable as a trait object
//! let caches: Vec<Arc<dyn ConcurrentCache<u64, String>>> =
//!     vec![Arc::new(lfu), Arc::new(lru)];
//! for cache in &caches {
//!     assert_eq!(*cache.get(&1).unwrap(), "value_1");
//! }
//! ```

use std::sync::Arc;

/// Contract shared by the internally-synchronized cache policies.
///
/// All operations are linearizable with respect to one another; a lookup
/// racing a removal of the same key observes either the value as it was
/// before the removal or a miss, never a half-applied state.
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Inserts or overwrites an entry. May trigger eviction when the
    /// cache is full and `key` is new; overwriting an existing key only
    /// replaces its value and never evicts.
    fn put(&self, key: K, value: V);

    /// Looks up a value. Misses have no side effect; hits update the
    /// policy's eviction bookkeeping for `key`.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Removes an entry if present. Removing an absent key is a no-op,
    /// not an error.
    fn evict(&self, key: &K);

    /// Returns `true` if `key` is cached, without touching eviction
    /// bookkeeping.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries, always `<= capacity()`.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lfu::LfuCache;
    use crate::policy::lru::LruCache;

    fn exercise_contract(cache: &dyn ConcurrentCache<u64, String>) {
        assert!(cache.is_empty());

        cache.put(1, "one".to_string());
        cache.put(2, "two".to_string());
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&1));
        assert_eq!(*cache.get(&1).unwrap(), "one");

        cache.put(1, "uno".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(*cache.get(&1).unwrap(), "uno");

        cache.evict(&2);
        assert!(!cache.contains(&2));
        // removing an absent key is a silent no-op
        cache.evict(&2);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn lfu_satisfies_contract_as_trait_object() {
        let cache: LfuCache<u64, String> = LfuCache::new(8);
        exercise_contract(&cache);
    }

    #[test]
    fn lru_satisfies_contract_as_trait_object() {
        let cache: LruCache<u64, String> = LruCache::new(8);
        exercise_contract(&cache);
    }
}
