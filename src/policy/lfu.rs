//! # LFU (Least Frequently Used) cache
//!
//! Bounded concurrent key/value cache that evicts the least frequently
//! accessed entries first, in amortized O(1) per operation. Frequency
//! ordering lives in a [`BucketChain`]; values live in the key index next
//! to it, and one lock keeps the two in agreement.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LfuCache<K, V>                             │
//!   │                                                                    │
//!   │   RwLock ─ one consistency domain for index + chain ─────────────┐ │
//!   │   │                                                              │ │
//!   │   │  index: FxHashMap<K, CacheSlot>     chain: BucketChain<K>    │ │
//!   │   │  ┌─────────┬────────────────────┐   freq 0 ─► freq 1 ─► ...  │ │
//!   │   │  │   Key   │ node id + value    │   (ascending, lazily       │ │
//!   │   │  ├─────────┼────────────────────┤    created buckets)        │ │
//!   │   │  │ page_a  │ n0, Mutex<Arc<V>>  │                            │ │
//!   │   │  │ page_b  │ n1, Mutex<Arc<V>>  │                            │ │
//!   │   │  └─────────┴────────────────────┘                            │ │
//!   │   └──────────────────────────────────────────────────────────────┘ │
//!   │                                                                    │
//!   │   capacity, eviction_factor: immutable after construction          │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation flow
//!
//! ```text
//!   put(key, value)
//!     key exists?  YES ─► swap the value slot under the READ lock;
//!                         frequency and eviction order are untouched
//!                  NO  ─► WRITE lock; re-check the index; if the cache
//!                         is full, run the eviction pass; insert at
//!                         frequency 0
//!
//!   get(&key)
//!     miss ─► None, no side effect
//!     hit  ─► WRITE lock; move the entry one bucket forward; return the
//!             value (the bump is structural, so it serializes with all
//!             other structural changes and no count is ever lost)
//!
//!   eviction pass (cache full, new key arriving)
//!     pop the oldest entry of the lowest bucket, drop it from the index,
//!     repeat until occupancy falls to floor(capacity * eviction_factor)
//!     (clamped below capacity). Batching the evictions amortizes the
//!     cost over many future inserts instead of paying one eviction per
//!     insert at the capacity boundary.
//! ```
//!
//! ## Concurrency
//!
//! Structural mutation (insert, frequency bump, eviction, clear) takes the
//! write lock; `parking_lot`'s fair queuing keeps writers from starving.
//! The one mutation that never touches the chain, overwriting the value
//! of an existing key, runs under the read lock through a small per-entry
//! mutex, so value refreshes scale with readers. Per-bucket locking is
//! deliberately avoided: a bump touches two adjacent buckets plus the
//! index, and splitting that across locks invites stale bucket pointers
//! and index/chain drift.
//!
//! A key inserted by one thread is visible to `get` on another only after
//! its bucket linkage is complete; there is no readiness flag to poll and
//! no background eviction task.
//!
//! ## Operations
//!
//! | Method                 | Complexity | Notes                             |
//! |------------------------|------------|-----------------------------------|
//! | `put(k, v)`            | O(1)*      | amortized; may run eviction pass  |
//! | `get(&k)`              | O(1)       | bumps frequency on hit            |
//! | `peek(&k)`             | O(1)       | read lock only, no bump           |
//! | `remove(&k)` / `evict` | O(1)       | idempotent                        |
//! | `pop_lfu()`            | O(1)       | evict exactly one                 |
//! | `frequency(&k)`        | O(1)       | 0 after insert, +1 per hit        |
//! | `len()` / `contains`   | O(1)       | read lock                         |
//!
//! ## Example
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//!
//! let cache = LfuCache::with_eviction_factor(4, 0.5);
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.put(3, "c");
//! cache.put(4, "d");
//!
//! cache.get(&1);
//! cache.get(&2);
//! cache.get(&4);
//!
//! // full: inserting key 5 first batch-evicts down to 2 entries:
//! // key 3 (never read), then key 1 (oldest among the once-read ties)
//! cache.put(5, "e");
//! assert_eq!(cache.len(), 3);
//! assert!(cache.get(&3).is_none());
//! assert!(cache.get(&2).is_some());
//! assert!(cache.get(&5).is_some());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::ds::{BucketChain, SlotId};
use crate::error::ConfigError;
use crate::stats::{CacheCounters, CacheStats};
use crate::traits::ConcurrentCache;

/// Fraction of capacity retained by an eviction pass when none is given.
pub const DEFAULT_EVICTION_FACTOR: f64 = 0.75;

const CHAIN_KEY_MISSING: &str = "chain key missing from index";

/// Index slot: the key's chain node plus its value.
///
/// The value sits behind its own mutex so an overwrite of an existing key
/// can go through the outer read lock; it is the one mutation that never
/// touches the chain.
#[derive(Debug)]
struct CacheSlot<V> {
    node: SlotId,
    value: Mutex<Arc<V>>,
}

#[derive(Debug)]
struct LfuState<K, V> {
    index: FxHashMap<K, CacheSlot<V>>,
    chain: BucketChain<K>,
}

/// Concurrent LFU cache with batch eviction.
///
/// Entries start at frequency 0 and move one frequency bucket forward per
/// [`get`](LfuCache::get). When an insert finds the cache full, a batch
/// eviction pass removes lowest-frequency entries (oldest arrival first
/// among ties) until occupancy drops to
/// `floor(capacity * eviction_factor)`.
///
/// All methods take `&self`; the cache is shared across threads behind a
/// plain `Arc`. See the module docs for the locking scheme.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use freqcache::policy::lfu::LfuCache;
///
/// let cache = Arc::new(LfuCache::new(100));
///
/// let writer = {
///     let cache = Arc::clone(&cache);
///     thread::spawn(move || {
///         for key in 0..50u32 {
///             cache.put(key, key * 2);
///         }
///     })
/// };
/// writer.join().unwrap();
///
/// assert_eq!(cache.len(), 50);
/// assert_eq!(*cache.get(&21).unwrap(), 42);
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    eviction_factor: f64,
    /// Occupancy after an eviction pass: `floor(capacity * factor)`,
    /// clamped to `capacity - 1` so a pass always frees at least one slot.
    evict_floor: usize,
    state: RwLock<LfuState<K, V>>,
    counters: CacheCounters,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_EVICTION_FACTOR`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_eviction_factor(capacity, DEFAULT_EVICTION_FACTOR)
    }

    /// Creates a cache that retains `floor(capacity * eviction_factor)`
    /// entries after each eviction pass.
    ///
    /// # Panics
    ///
    /// Panics if parameters are invalid. See
    /// [`try_with_eviction_factor`](Self::try_with_eviction_factor).
    pub fn with_eviction_factor(capacity: usize, eviction_factor: f64) -> Self {
        match Self::try_with_eviction_factor(capacity, eviction_factor) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }

    /// Fallible constructor validating user-configurable parameters.
    ///
    /// `capacity` must be non-zero and `eviction_factor` must be a finite
    /// value in `(0.0, 1.0]`. A factor of 1.0 still evicts: the pass
    /// target is clamped to `capacity - 1` so an insert into a full cache
    /// always frees room.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::<u64, String>::try_with_eviction_factor(100, 0.5);
    /// assert!(cache.is_ok());
    ///
    /// assert!(LfuCache::<u64, String>::try_with_eviction_factor(0, 0.5).is_err());
    /// assert!(LfuCache::<u64, String>::try_with_eviction_factor(100, 0.0).is_err());
    /// assert!(LfuCache::<u64, String>::try_with_eviction_factor(100, 1.5).is_err());
    /// ```
    pub fn try_with_eviction_factor(
        capacity: usize,
        eviction_factor: f64,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }
        if !eviction_factor.is_finite() || eviction_factor <= 0.0 || eviction_factor > 1.0 {
            return Err(ConfigError::new(format!(
                "eviction_factor must be in (0.0, 1.0], got {}",
                eviction_factor
            )));
        }

        let evict_floor =
            ((capacity as f64 * eviction_factor).floor() as usize).min(capacity - 1);

        Ok(Self {
            capacity,
            eviction_factor,
            evict_floor,
            state: RwLock::new(LfuState {
                index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                chain: BucketChain::with_capacity(capacity),
            }),
            counters: CacheCounters::default(),
        })
    }

    /// Inserts a new entry or overwrites an existing one.
    ///
    /// Overwriting replaces only the value: the key's frequency and its
    /// eviction priority are unchanged, and no eviction can trigger. A new
    /// key enters at frequency 0; if the cache is full, the eviction pass
    /// runs first.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::new(10);
    /// cache.put(1, "one");
    /// cache.get(&1);
    ///
    /// // overwrite keeps the access count
    /// cache.put(1, "uno");
    /// assert_eq!(*cache.get(&1).unwrap(), "uno");
    /// assert_eq!(cache.frequency(&1), Some(2));
    /// ```
    pub fn put(&self, key: K, value: V) {
        let value = Arc::new(value);

        {
            let state = self.state.read();
            if let Some(slot) = state.index.get(&key) {
                *slot.value.lock() = value;
                self.counters.record_update();
                return;
            }
        }

        let mut state = self.state.write();
        // re-check: a racing put may have inserted the key between locks
        if let Some(slot) = state.index.get(&key) {
            *slot.value.lock() = value;
            self.counters.record_update();
            return;
        }

        if state.index.len() >= self.capacity {
            self.evict_to_floor(&mut state);
        }

        let node = state.chain.push_new(key.clone());
        state.index.insert(
            key,
            CacheSlot {
                node,
                value: Mutex::new(value),
            },
        );
        self.counters.record_insert();
    }

    /// Looks up a value, counting the access.
    ///
    /// A hit moves the key one frequency bucket forward; a miss has no
    /// side effect beyond the miss counter.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::new(10);
    /// cache.put(1, "one");
    ///
    /// assert_eq!(*cache.get(&1).unwrap(), "one");
    /// assert!(cache.get(&99).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut state = self.state.write();
        let hit = state
            .index
            .get(key)
            .map(|slot| (slot.node, Arc::clone(&slot.value.lock())));

        match hit {
            Some((node, value)) => {
                state.chain.bump(node);
                self.counters.record_hit();
                Some(value)
            },
            None => {
                self.counters.record_miss();
                None
            },
        }
    }

    /// Looks up a value without counting the access.
    ///
    /// Takes only the read lock and leaves the key's frequency and
    /// eviction priority untouched.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let state = self.state.read();
        let slot = state.index.get(key)?;
        Some(Arc::clone(&slot.value.lock()))
    }

    /// Removes an entry if present. Removing an absent key is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::new(10);
    /// cache.put(1, "one");
    ///
    /// cache.evict(&1);
    /// cache.evict(&1); // absent: silently ignored
    /// assert!(cache.is_empty());
    /// ```
    pub fn evict(&self, key: &K) {
        self.remove(key);
    }

    /// Removes an entry and returns its value, or `None` if absent.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut state = self.state.write();
        let slot = state.index.remove(key)?;
        state.chain.remove(slot.node);
        self.counters.record_remove();
        Some(slot.value.into_inner())
    }

    /// Removes and returns the current eviction candidate: the entry with
    /// the lowest access count, oldest arrival breaking ties.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::new(10);
    /// cache.put(1, "one");
    /// cache.put(2, "two");
    /// cache.get(&1);
    ///
    /// let (key, value) = cache.pop_lfu().unwrap();
    /// assert_eq!(key, 2);
    /// assert_eq!(*value, "two");
    /// ```
    pub fn pop_lfu(&self) -> Option<(K, Arc<V>)> {
        let mut state = self.state.write();
        let (key, _freq) = state.chain.pop_min()?;
        let slot = state.index.remove(&key).expect(CHAIN_KEY_MISSING);
        self.counters.record_eviction();
        Some((key, slot.value.into_inner()))
    }

    /// Returns the current eviction candidate without removing it.
    pub fn peek_lfu(&self) -> Option<(K, Arc<V>)> {
        let state = self.state.read();
        let (key, _freq) = state.chain.peek_min()?;
        let slot = state.index.get(key).expect(CHAIN_KEY_MISSING);
        Some((key.clone(), Arc::clone(&slot.value.lock())))
    }

    /// Returns the key's current access count: 0 after insert, plus one
    /// per [`get`](Self::get).
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    ///
    /// let cache = LfuCache::new(10);
    /// cache.put(1, "one");
    /// assert_eq!(cache.frequency(&1), Some(0));
    ///
    /// cache.get(&1);
    /// cache.get(&1);
    /// assert_eq!(cache.frequency(&1), Some(2));
    /// assert_eq!(cache.frequency(&99), None);
    /// ```
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let state = self.state.read();
        let slot = state.index.get(key)?;
        Some(state.chain.frequency(slot.node))
    }

    /// Returns `true` if `key` is cached. No frequency side effect.
    pub fn contains(&self, key: &K) -> bool {
        self.state.read().index.contains_key(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured eviction factor.
    pub fn eviction_factor(&self) -> f64 {
        self.eviction_factor
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.index.clear();
        state.chain.clear();
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Evicts lowest-frequency entries until occupancy reaches the
    /// configured floor. Called with the cache full, so this always
    /// removes at least one entry.
    fn evict_to_floor(&self, state: &mut LfuState<K, V>) {
        while state.index.len() > self.evict_floor {
            let Some((key, _freq)) = state.chain.pop_min() else {
                break;
            };
            state.index.remove(&key).expect(CHAIN_KEY_MISSING);
            self.counters.record_eviction();
        }
    }

    /// Validates the cross-structure invariants (debug builds only):
    /// index and chain agree on membership and size, every index entry
    /// resolves to its own chain node, occupancy respects capacity, and
    /// the chain's link structure is intact.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: fmt::Debug,
    {
        use crate::error::InvariantError;

        let state = self.state.read();

        if state.index.len() != state.chain.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but chain holds {}",
                state.index.len(),
                state.chain.len()
            )));
        }
        if state.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "occupancy {} exceeds capacity {}",
                state.index.len(),
                self.capacity
            )));
        }

        for (id, key, _freq) in state.chain.iter_entries() {
            match state.index.get(key) {
                Some(slot) if slot.node == id => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "key {:?} indexed against a different chain node",
                        key
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "key {:?} reachable from the chain but missing from the index",
                        key
                    )));
                },
            }
        }
        for (key, slot) in &state.index {
            if state.chain.key(slot.node) != key {
                return Err(InvariantError::new(format!(
                    "index entry {:?} resolves to a chain node holding a different key",
                    key
                )));
            }
        }

        state.chain.debug_validate_invariants();
        Ok(())
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("eviction_factor", &self.eviction_factor)
            .finish_non_exhaustive()
    }
}

impl<K, V> ConcurrentCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    fn put(&self, key: K, value: V) {
        LfuCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LfuCache::get(self, key)
    }

    fn evict(&self, key: &K) {
        LfuCache::evict(self, key);
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }

    fn clear(&self) {
        LfuCache::clear(self);
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Capacity bound and cross-structure invariants survive any
        /// operation sequence.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_invariants_always_hold(
            ops in prop::collection::vec((0u8..4, 0u32..24), 0..200)
        ) {
            let cache = LfuCache::with_eviction_factor(8, 0.5);

            for (op, key) in ops {
                match op % 4 {
                    0 => cache.put(key, key as u64),
                    1 => {
                        cache.get(&key);
                    }
                    2 => cache.evict(&key),
                    3 => {
                        cache.pop_lfu();
                    }
                    _ => unreachable!(),
                }

                prop_assert!(cache.len() <= cache.capacity());
                cache.check_invariants().unwrap();
            }
        }

        /// A key that was just put is immediately visible, whatever came
        /// before.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_put_is_immediately_visible(
            warmup in prop::collection::vec(0u32..16, 0..80),
            key in 0u32..16
        ) {
            let cache = LfuCache::with_eviction_factor(4, 0.5);
            for warm_key in warmup {
                cache.put(warm_key, u64::from(warm_key));
            }

            cache.put(key, 999);
            let got = cache.get(&key);
            prop_assert_eq!(got.as_deref(), Some(&999));
        }
    }
}
