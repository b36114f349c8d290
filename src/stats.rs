//! Operation counters shared by the cache policies.
//!
//! Counters are plain relaxed atomics updated on every operation and read
//! out as a [`CacheStats`] snapshot. They observe the cache; they never
//! influence eviction decisions.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a cache's operation counters.
///
/// # Example
///
/// ```
/// use freqcache::policy::lfu::LfuCache;
///
/// let cache = LfuCache::new(10);
/// cache.put(1, "one");
/// cache.get(&1);
/// cache.get(&2);
///
/// let stats = cache.stats();
/// assert_eq!(stats.inserts, 1);
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub removes: u64,
    pub evictions: u64,
}

/// Internal atomic counters backing [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    removes: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_snapshot() {
        let counters = CacheCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        counters.record_insert();
        counters.record_update();
        counters.record_remove();
        counters.record_eviction();

        let stats = counters.snapshot();
        assert_eq!(
            stats,
            CacheStats {
                hits: 2,
                misses: 1,
                inserts: 1,
                updates: 1,
                removes: 1,
                evictions: 1,
            }
        );
    }

    #[test]
    fn fresh_counters_snapshot_to_zero() {
        let counters = CacheCounters::default();
        assert_eq!(counters.snapshot(), CacheStats::default());
    }
}
