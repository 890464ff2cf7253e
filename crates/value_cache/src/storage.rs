//! Bounded storage for memoized resolution results.
//!
//! Items are type-erased so one store can hold the outputs of every
//! resolver (strings, split lists, gradient descriptors). The namespace in
//! each key keeps different result types apart.

use crate::key::CacheKey;
use core::any::Any;
use core::num::NonZeroUsize;
use log::trace;
use lru::LruCache;
use std::rc::Rc;

/// Number of entries kept before the least recently used one is evicted.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A memoized outcome: either a value or the explicit "resolved to nothing".
#[derive(Clone)]
pub struct CacheItem {
    item: Option<Rc<dyn Any>>,
}

impl CacheItem {
    /// Whether the cached computation resolved to nothing.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.item.is_none()
    }

    /// The cached value, if present and of type `T`.
    #[inline]
    pub fn item<T: Any>(&self) -> Option<&T> {
        self.item.as_ref()?.downcast_ref::<T>()
    }
}

impl core::fmt::Debug for CacheItem {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("CacheItem")
            .field("is_null", &self.is_null())
            .finish()
    }
}

/// LRU-bounded map from cache key to [`CacheItem`].
#[derive(Debug)]
pub struct ValueCache {
    entries: LruCache<CacheKey, CacheItem>,
    /// Number of lookups answered from the cache.
    hits: usize,
    /// Number of lookups that found nothing.
    misses: usize,
    /// Resolutions cut short by a nesting limit. Never reset.
    truncations: usize,
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ValueCache {
    /// Create a cache holding at most `capacity` entries (at least one).
    #[inline]
    pub fn new(capacity: usize) -> Self {
        let bounded = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(bounded),
            hits: 0,
            misses: 0,
            truncations: 0,
        }
    }

    /// Look up a memoized outcome. `None` means "not cached yet".
    ///
    /// A `None` key (uncacheable request) always misses.
    pub fn get(&mut self, key: Option<&CacheKey>) -> Option<CacheItem> {
        let found = key.and_then(|cache_key| self.entries.get(cache_key).cloned());
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Record an outcome. `None` stores the null item.
    ///
    /// A `None` key (uncacheable request) is ignored.
    pub fn set<T: Any>(&mut self, key: Option<&CacheKey>, value: Option<T>) {
        let Some(cache_key) = key else {
            return;
        };
        let item = CacheItem {
            item: value.map(|inner| Rc::new(inner) as Rc<dyn Any>),
        };
        trace!("[CACHE] store {cache_key} null={}", item.is_null());
        self.entries.put(cache_key.clone(), item);
    }

    /// Record that a resolution was cut short by a nesting limit.
    ///
    /// Outcomes computed across the cut depend on the depth they started
    /// at, so [`Self::set_since`] refuses to store them.
    #[inline]
    pub fn note_truncation(&mut self) {
        self.truncations += 1;
    }

    /// Mark to pass to [`Self::set_since`] once the computation finishes.
    #[inline]
    pub const fn truncation_mark(&self) -> usize {
        self.truncations
    }

    /// [`Self::set`], skipped when a resolution was cut short since `mark`.
    pub fn set_since<T: Any>(&mut self, mark: usize, key: Option<&CacheKey>, value: Option<T>) {
        if self.truncations != mark {
            trace!("[CACHE] skip store after truncated resolution");
            return;
        }
        self.set(key, value);
    }

    /// Drop every entry and reset the hit and miss counters.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    #[inline]
    pub const fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeyData, KeyOptions, create_cache_key};
    use serde::Serialize;

    #[derive(Serialize)]
    struct NoOptions;

    impl KeyOptions for NoOptions {
        fn is_cacheable(&self) -> bool {
            true
        }
    }

    fn key(value: &str) -> Option<CacheKey> {
        create_cache_key(&KeyData::new("test", "op", value), &NoOptions)
    }

    #[test]
    fn miss_then_hit() {
        let mut cache = ValueCache::default();
        let cache_key = key("red");
        assert!(cache.get(cache_key.as_ref()).is_none());
        cache.set(cache_key.as_ref(), Some("rgb(255, 0, 0)".to_owned()));
        let item = cache.get(cache_key.as_ref()).unwrap();
        assert!(!item.is_null());
        assert_eq!(item.item::<String>().map(String::as_str), Some("rgb(255, 0, 0)"));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn null_items_are_distinct_from_misses() {
        let mut cache = ValueCache::default();
        let cache_key = key("bogus");
        cache.set::<String>(cache_key.as_ref(), None);
        let item = cache.get(cache_key.as_ref()).unwrap();
        assert!(item.is_null());
        assert!(item.item::<String>().is_none());
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = ValueCache::new(2);
        let (first, second, third) = (key("a"), key("b"), key("c"));
        cache.set(first.as_ref(), Some(1_u8));
        cache.set(second.as_ref(), Some(2_u8));
        assert!(cache.get(first.as_ref()).is_some());
        cache.set(third.as_ref(), Some(3_u8));
        assert!(cache.get(second.as_ref()).is_none());
        assert!(cache.get(first.as_ref()).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn truncated_outcomes_are_not_stored() {
        let mut cache = ValueCache::default();
        let (cut, whole) = (key("cut"), key("whole"));
        let mark = cache.truncation_mark();
        cache.note_truncation();
        cache.set_since::<String>(mark, cut.as_ref(), None);
        assert!(cache.get(cut.as_ref()).is_none());
        let mark = cache.truncation_mark();
        cache.set_since(mark, whole.as_ref(), Some(1_u8));
        assert!(cache.get(whole.as_ref()).is_some());
        assert!(format!("{cache:?}").starts_with("ValueCache"));
    }

    #[test]
    fn uncacheable_requests_are_ignored() {
        let mut cache = ValueCache::default();
        cache.set(None, Some(1_u8));
        assert!(cache.is_empty());
        assert!(cache.get(None).is_none());
    }
}
