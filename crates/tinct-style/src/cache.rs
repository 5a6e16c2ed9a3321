#![forbid(unsafe_code)]

//! Bounded, thread-safe LRU cache keyed by RGB color.
//!
//! Each conversion kind (palette lookup, foreground fragment, background
//! fragment) owns its own strongly typed [`RgbCache`]. Capacities are tiny
//! (an application renders a small fixed set of colors), so eviction is a
//! linear scan for the smallest recency stamp instead of a linked list.
//!
//! # Recency
//!
//! Recency is a logical clock, not wall time. Every `get` and every `put`,
//! hit or miss, advances the clock by one. An entry remembers the largest
//! stamp it has been touched with.
//!
//! # Thread Safety
//!
//! Lookups take a shared read lock and refresh the entry's stamp through an
//! atomic, so concurrent `get`s never exclude each other. Inserts, updates,
//! and evictions take the write lock, which also orders `put`s on the same
//! key: the last writer wins and carries the newest stamp.
//!
//! # Example
//! ```
//! use tinct_style::{Rgb, RgbCache};
//!
//! let cache = RgbCache::new("example", 2);
//! cache.put(Rgb::new(1, 0, 0), "a");
//! cache.put(Rgb::new(2, 0, 0), "b");
//! assert_eq!(cache.get(&Rgb::new(1, 0, 0)), Some("a"));
//!
//! // (2, 0, 0) is now least recently used and makes room.
//! cache.put(Rgb::new(3, 0, 0), "c");
//! assert!(!cache.contains(&Rgb::new(2, 0, 0)));
//! assert_eq!(cache.len(), 2);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;

use crate::color::Rgb;

/// Statistics for an [`RgbCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries dropped to make room.
    pub evictions: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_used: AtomicU64,
}

impl<V> Entry<V> {
    fn new(value: V, stamp: u64) -> Self {
        Self {
            value,
            last_used: AtomicU64::new(stamp),
        }
    }

    /// Never moves the stamp backwards, even if a slower reader arrives late.
    fn touch(&self, stamp: u64) {
        self.last_used.fetch_max(stamp, Ordering::Relaxed);
    }

    fn stamp(&self) -> u64 {
        self.last_used.load(Ordering::Relaxed)
    }
}

/// Bounded LRU cache from [`Rgb`] to a cloneable value.
///
/// A capacity of zero leaves the cache permanently empty: every `put` is
/// dropped, every `get` misses.
#[derive(Debug)]
pub struct RgbCache<V> {
    name: &'static str,
    capacity: usize,
    entries: RwLock<FxHashMap<Rgb, Entry<V>>>,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> RgbCache<V> {
    /// Create an empty cache. `name` identifies the cache in log events.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize) -> Self {
        if capacity == 0 {
            tinct_core::debug!(cache = name, "capacity 0, memoization disabled");
        } else {
            tinct_core::debug!(cache = name, capacity, "color cache created");
        }
        Self {
            name,
            capacity,
            entries: RwLock::new(FxHashMap::with_capacity_and_hasher(
                capacity.min(64),
                Default::default(),
            )),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a value, marking it most recently used on a hit.
    pub fn get(&self, key: &Rgb) -> Option<V> {
        let stamp = self.tick();
        let entries = self.read();
        if let Some(entry) = entries.get(key) {
            entry.touch(stamp);
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(entry.value.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert or replace a value.
    ///
    /// Replacing an existing key refreshes its recency and does not count
    /// against capacity. Inserting a new key into a full cache first evicts
    /// exactly one least recently used entry.
    pub fn put(&self, key: Rgb, value: V) {
        let mut entries = self.write();
        // Stamped under the write lock so same-key puts are ordered by it.
        let stamp = self.tick();
        if self.capacity == 0 {
            return;
        }
        if let Some(entry) = entries.get_mut(&key) {
            entry.value = value;
            entry.touch(stamp);
            return;
        }
        if entries.len() >= self.capacity {
            self.evict_one(&mut entries);
        }
        entries.insert(key, Entry::new(value, stamp));
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&self, key: Rgb, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.put(key, value.clone());
        value
    }

    /// Check for a key without touching its recency or the statistics.
    #[must_use]
    pub fn contains(&self, key: &Rgb) -> bool {
        self.read().contains_key(key)
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Name used in log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Reset hit, miss, and eviction counters.
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    /// Return current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.len(),
            capacity: self.capacity,
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn evict_one(&self, entries: &mut FxHashMap<Rgb, Entry<V>>) {
        let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.stamp())
            .map(|(key, _)| *key)
        else {
            return;
        };
        entries.remove(&oldest);
        self.evictions.fetch_add(1, Ordering::Relaxed);
        tinct_core::trace!(
            cache = self.name,
            evicted = %oldest,
            size = entries.len(),
            capacity = self.capacity,
            "evicted least recently used color"
        );
    }

    // Poisoning cannot leave the map half-updated: every mutation is a single
    // map call, so the inner guard is always safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<Rgb, Entry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<Rgb, Entry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Rgb {
        Rgb::new(n, 0, 0)
    }

    #[test]
    fn get_on_empty_cache_misses() {
        let cache: RgbCache<u8> = RgbCache::new("test", 4);
        assert_eq!(cache.get(&key(1)), None);
        assert_eq!(cache.stats().misses, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let cache = RgbCache::new("test", 2);
        cache.put(key(b'a'), 'a');
        cache.put(key(b'b'), 'b');
        assert_eq!(cache.get(&key(b'a')), Some('a'));
        cache.put(key(b'c'), 'c');

        assert_eq!(cache.get(&key(b'b')), None);
        assert_eq!(cache.get(&key(b'a')), Some('a'));
        assert_eq!(cache.get(&key(b'c')), Some('c'));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn put_refreshes_recency() {
        let cache = RgbCache::new("test", 2);
        cache.put(key(1), 1);
        cache.put(key(2), 2);
        cache.put(key(1), 10);
        cache.put(key(3), 3);

        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
    }

    #[test]
    fn repeated_put_replaces_value_without_growing() {
        let cache = RgbCache::new("test", 4);
        cache.put(key(7), "v1");
        let before = cache.len();
        cache.put(key(7), "v2");
        assert_eq!(cache.get(&key(7)), Some("v2"));
        assert_eq!(cache.len(), before);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let cache = RgbCache::new("test", 10);
        for n in 0..100u8 {
            cache.put(key(n), n);
            assert!(cache.len() <= 10, "len {} after put {n}", cache.len());
        }
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.stats().evictions, 90);
        // The ten most recent survive.
        for n in 90..100u8 {
            assert_eq!(cache.get(&key(n)), Some(n));
        }
    }

    #[test]
    fn each_overflowing_put_evicts_exactly_one() {
        let cache = RgbCache::new("test", 3);
        for n in 0..3u8 {
            cache.put(key(n), n);
        }
        for n in 3..10u8 {
            let before = cache.stats().evictions;
            cache.put(key(n), n);
            assert_eq!(cache.stats().evictions, before + 1);
            assert_eq!(cache.len(), 3);
        }
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = RgbCache::new("test", 0);
        cache.put(key(1), 1);
        assert_eq!(cache.get(&key(1)), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let cache = RgbCache::new("test", 4);
        let mut calls = 0;
        let first = cache.get_or_insert_with(key(5), || {
            calls += 1;
            50
        });
        let second = cache.get_or_insert_with(key(5), || {
            calls += 1;
            99
        });
        assert_eq!((first, second), (50, 50));
        assert_eq!(calls, 1);
    }

    #[test]
    fn contains_does_not_affect_recency_or_stats() {
        let cache = RgbCache::new("test", 2);
        cache.put(key(1), 1);
        cache.put(key(2), 2);
        assert!(cache.contains(&key(1)));
        cache.put(key(3), 3);
        assert!(!cache.contains(&key(1)));
        assert_eq!(cache.stats().hits + cache.stats().misses, 0);
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let cache = RgbCache::new("test", 8);
        cache.put(key(1), 1);
        let _ = cache.get(&key(1));
        let _ = cache.get(&key(1));
        let _ = cache.get(&key(2));
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 8);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn hit_rate_of_unused_cache_is_zero() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn clear_and_reset_stats() {
        let cache = RgbCache::new("test", 4);
        cache.put(key(1), 1);
        let _ = cache.get(&key(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);
        cache.reset_stats();
        assert_eq!(cache.stats(), CacheStats {
            capacity: 4,
            ..CacheStats::default()
        });
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let cache = std::sync::Arc::new(RgbCache::new("test", 4));
        cache.put(key(1), 1);
        let poisoner = std::sync::Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write();
            panic!("poison the cache lock");
        })
        .join();
        assert!(cache.entries.is_poisoned());
        assert_eq!(cache.get(&key(1)), Some(1));
        cache.put(key(2), 2);
        assert_eq!(cache.len(), 2);
    }

    #[cfg(feature = "tracing")]
    mod logging {
        use super::*;
        use tracing_test::traced_test;

        #[traced_test]
        #[test]
        fn eviction_is_logged() {
            let cache = RgbCache::new("palette", 1);
            cache.put(Rgb::new(1, 2, 3), 0u8);
            cache.put(Rgb::new(4, 5, 6), 1u8);
            assert!(logs_contain("evicted least recently used color"));
            assert!(logs_contain("#010203"));
        }
    }
}
