// ==============================================
// LRU CONCURRENCY TESTS (integration)
// ==============================================
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use freqcache::policy::lru::LruCache;

#[test]
fn test_concurrent_inserts() {
    let capacity = 1_600;
    let cache: Arc<LruCache<u64, u64>> = Arc::new(LruCache::new(capacity));

    let num_threads = 8;
    let inserts_per_thread = 200;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..inserts_per_thread {
                    let key = (thread_id * inserts_per_thread + i) as u64;
                    cache.put(key, key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), num_threads * inserts_per_thread);
    assert_eq!(cache.stats().evictions, 0);
}

#[test]
fn test_concurrent_reads() {
    let capacity = 512;
    let cache: Arc<LruCache<u64, u64>> = Arc::new(LruCache::new(capacity));

    for key in 0..capacity {
        cache.put(key as u64, key as u64 * 2);
    }

    let reader_threads = 16;
    let reads_per_thread = 800;
    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..reader_threads)
        .map(|_| {
            let cache = cache.clone();
            let hits = hits.clone();
            thread::spawn(move || {
                for i in 0..reads_per_thread {
                    let key = (i % capacity) as u64;
                    if cache.get(&key).is_some() {
                        hits.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // nothing is inserted, so nothing can be evicted: every read hits
    assert_eq!(hits.load(Ordering::Relaxed), reader_threads * reads_per_thread);
    assert_eq!(cache.len(), capacity);
}

#[test]
fn test_mixed_workload_under_contention() {
    let capacity = 100;
    let cache: Arc<LruCache<u64, String>> = Arc::new(LruCache::new(capacity));

    let num_threads = 8;
    let ops_per_thread = 2_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = ((thread_id * ops_per_thread + i) % (capacity * 2)) as u64;
                    match i % 5 {
                        0 | 1 => cache.put(key, format!("value_{key}")),
                        2 | 3 => {
                            if let Some(value) = cache.get(&key) {
                                assert_eq!(*value, format!("value_{key}"));
                            }
                        },
                        _ => cache.evict(&key),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
    #[cfg(debug_assertions)]
    cache.check_invariants().unwrap();
}
