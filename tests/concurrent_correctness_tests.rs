//! Concurrent Correctness Tests
//!
//! These tests check that the single table lock serializes every operation:
//! no lost access-count updates, and the size and uniqueness invariants hold
//! while many threads put and get at once.

use forgetful_map::{ForgetfulHashMap, KeyValueMap};
use scoped_threadpool::Pool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

// ============================================================================
// ACCESS COUNTS
// ============================================================================

#[test]
fn test_concurrent_readers_lose_no_updates() {
    let map: ForgetfulHashMap<String, i32> = ForgetfulHashMap::try_new(3).unwrap();
    map.put("threadSafe".to_string(), 0);

    let mut pool = Pool::new(6);
    pool.scoped(|scope| {
        for _ in 0..5 {
            scope.execute(|| {
                for _ in 0..1000 {
                    map.get("threadSafe");
                }
            });
        }
    });

    assert_eq!(map.access_count("threadSafe"), 5000);
}

#[test]
fn test_concurrent_readers_on_distinct_keys() {
    let map: Arc<ForgetfulHashMap<u32, u32>> = Arc::new(ForgetfulHashMap::try_new(8).unwrap());
    for key in 0..8 {
        map.put(key, key * 10);
    }

    let handles: Vec<_> = (0..8u32)
        .map(|key| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..(key + 1) * 100 {
                    assert_eq!(map.get(&key), Some(key * 10));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for key in 0..8u32 {
        assert_eq!(map.access_count(&key), u64::from((key + 1) * 100));
    }
    assert_eq!(map.counters().cache_hits, 3600);
}

// ============================================================================
// INVARIANTS UNDER CONTENTION
// ============================================================================

#[test]
fn test_concurrent_writers_respect_capacity() {
    let map: Arc<ForgetfulHashMap<usize, usize>> =
        Arc::new(ForgetfulHashMap::try_new(16).unwrap());
    let puts = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let map = Arc::clone(&map);
            let puts = Arc::clone(&puts);
            thread::spawn(move || {
                for i in 0..500 {
                    map.put(t * 1000 + i, i);
                    puts.fetch_add(1, Ordering::Relaxed);
                    assert!(map.size() <= 16);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(puts.load(Ordering::Relaxed), 2000);
    assert_eq!(map.size(), 16);

    let counters = map.counters();
    assert_eq!(counters.insertions, 2000);
    assert_eq!(counters.evictions, 2000 - 16);
}

#[test]
fn test_concurrent_overwrites_keep_keys_unique() {
    let map: Arc<ForgetfulHashMap<u8, usize>> = Arc::new(ForgetfulHashMap::try_new(4).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..1000 {
                    map.put((i % 4) as u8, t);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(map.size(), 4);
    let table = Arc::try_unwrap(map).unwrap().into_inner();
    assert_eq!(table.counters().evictions, 0);
    for key in 0..4u8 {
        assert!(table.contains_key(&key));
    }
}
