//! LRU (Least Recently Used) cache.
//!
//! Sibling of [`LfuCache`](crate::policy::lfu::LfuCache) behind the same
//! [`ConcurrentCache`](crate::traits::ConcurrentCache) contract. The
//! structure is the classic one: a key index over an intrusive
//! access-order list, oldest at the head. `get` and `put` both refresh
//! recency; inserting into a full cache evicts exactly one entry, the
//! least recently used.
//!
//! A single mutex guards the whole state: recency updates mutate the
//! list on every hit, so there is no useful read-only path to split out.
//!
//! # Example
//!
//! ```
//! use freqcache::policy::lru::LruCache;
//!
//! let cache = LruCache::new(2);
//! cache.put(1, "one");
//! cache.put(2, "two");
//!
//! cache.get(&1);           // 1 is now the most recently used
//! cache.put(3, "three");   // evicts 2
//!
//! assert!(cache.get(&2).is_none());
//! assert!(cache.get(&1).is_some());
//! assert!(cache.get(&3).is_some());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{SlotArena, SlotId};
use crate::error::ConfigError;
use crate::stats::{CacheCounters, CacheStats};
use crate::traits::ConcurrentCache;

const ENTRY_MISSING: &str = "lru entry missing";

#[derive(Debug)]
struct LruEntry<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    key: K,
    value: Arc<V>,
}

#[derive(Debug)]
struct LruState<K, V> {
    index: FxHashMap<K, SlotId>,
    entries: SlotArena<LruEntry<K, V>>,
    /// Least recently used; evicted first.
    head: Option<SlotId>,
    /// Most recently used.
    tail: Option<SlotId>,
}

impl<K, V> LruState<K, V> {
    fn detach(&mut self, id: SlotId) {
        let (prev, next) = {
            let entry = self.entries.get(id).expect(ENTRY_MISSING);
            (entry.prev, entry.next)
        };

        match prev {
            Some(prev_id) => self.entries.get_mut(prev_id).expect(ENTRY_MISSING).next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.entries.get_mut(next_id).expect(ENTRY_MISSING).prev = prev,
            None => self.tail = prev,
        }

        let entry = self.entries.get_mut(id).expect(ENTRY_MISSING);
        entry.prev = None;
        entry.next = None;
    }

    fn push_tail(&mut self, id: SlotId) {
        let old_tail = self.tail;
        {
            let entry = self.entries.get_mut(id).expect(ENTRY_MISSING);
            entry.prev = old_tail;
            entry.next = None;
        }
        match old_tail {
            Some(tail_id) => self.entries.get_mut(tail_id).expect(ENTRY_MISSING).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }
}

/// Concurrent LRU cache: bounded map in access order, evict-oldest.
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    state: Mutex<LruState<K, V>>,
    counters: CacheCounters,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache bounded to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }

    /// Fallible constructor; rejects a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(LruState {
                index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                entries: SlotArena::with_capacity(capacity),
                head: None,
                tail: None,
            }),
            counters: CacheCounters::default(),
        })
    }

    /// Inserts or overwrites an entry; either way the key becomes the
    /// most recently used. A new key into a full cache evicts the least
    /// recently used entry first.
    pub fn put(&self, key: K, value: V) {
        let value = Arc::new(value);
        let mut state = self.state.lock();

        if let Some(&id) = state.index.get(&key) {
            state.entries.get_mut(id).expect(ENTRY_MISSING).value = value;
            state.detach(id);
            state.push_tail(id);
            self.counters.record_update();
            return;
        }

        if state.index.len() >= self.capacity
            && let Some(oldest) = state.head
        {
            state.detach(oldest);
            let entry = state.entries.remove(oldest).expect(ENTRY_MISSING);
            state.index.remove(&entry.key).expect(ENTRY_MISSING);
            self.counters.record_eviction();
        }

        let id = state.entries.insert(LruEntry {
            prev: None,
            next: None,
            key: key.clone(),
            value,
        });
        state.push_tail(id);
        state.index.insert(key, id);
        self.counters.record_insert();
    }

    /// Looks up a value, marking the key most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut state = self.state.lock();
        match state.index.get(key).copied() {
            Some(id) => {
                state.detach(id);
                state.push_tail(id);
                let value = Arc::clone(&state.entries.get(id).expect(ENTRY_MISSING).value);
                self.counters.record_hit();
                Some(value)
            },
            None => {
                self.counters.record_miss();
                None
            },
        }
    }

    /// Looks up a value without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let state = self.state.lock();
        let id = state.index.get(key).copied()?;
        Some(Arc::clone(&state.entries.get(id).expect(ENTRY_MISSING).value))
    }

    /// Removes an entry if present. Removing an absent key is a no-op.
    pub fn evict(&self, key: &K) {
        self.remove(key);
    }

    /// Removes an entry and returns its value, or `None` if absent.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut state = self.state.lock();
        let id = state.index.remove(key)?;
        state.detach(id);
        let entry = state.entries.remove(id).expect(ENTRY_MISSING);
        self.counters.record_remove();
        Some(entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        let mut state = self.state.lock();
        let oldest = state.head?;
        state.detach(oldest);
        let entry = state.entries.remove(oldest).expect(ENTRY_MISSING);
        state.index.remove(&entry.key).expect(ENTRY_MISSING);
        self.counters.record_eviction();
        Some((entry.key, entry.value))
    }

    /// Returns `true` if `key` is cached, without refreshing recency.
    pub fn contains(&self, key: &K) -> bool {
        self.state.lock().index.contains_key(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.entries.clear();
        state.head = None;
        state.tail = None;
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Validates index/list agreement (debug builds only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: fmt::Debug,
    {
        use crate::error::InvariantError;

        let state = self.state.lock();

        if state.index.len() != state.entries.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but the list holds {}",
                state.index.len(),
                state.entries.len()
            )));
        }
        if state.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "occupancy {} exceeds capacity {}",
                state.index.len(),
                self.capacity
            )));
        }

        let mut walked = 0usize;
        let mut cursor = state.head;
        let mut last = None;
        while let Some(id) = cursor {
            let entry = state
                .entries
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("stale list id {:?}", id)))?;
            if entry.prev != last {
                return Err(InvariantError::new(format!(
                    "entry {:?} has an inconsistent back-link",
                    entry.key
                )));
            }
            if state.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "entry {:?} not indexed against its own list node",
                    entry.key
                )));
            }
            last = Some(id);
            cursor = entry.next;
            walked += 1;
        }
        if state.tail != last {
            return Err(InvariantError::new("list tail out of sync"));
        }
        if walked != state.entries.len() {
            return Err(InvariantError::new(format!(
                "list reaches {} entries but the arena holds {}",
                walked,
                state.entries.len()
            )));
        }
        Ok(())
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> ConcurrentCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LruCache::get(self, key)
    }

    fn evict(&self, key: &K) {
        LruCache::evict(self, key);
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn clear(&self) {
        LruCache::clear(self);
    }
}
