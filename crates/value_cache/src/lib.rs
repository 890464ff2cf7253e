//! Memoization cache for CSS value resolution.
//!
//! Every resolver in the CSS module crates checks this cache on entry and
//! writes its outcome on exit, so repeated identical queries skip the
//! tokenize/parse work entirely. Failed resolutions are cached too, as a
//! null item.
//!
//! # Architecture
//!
//! ```text
//! caller → create_cache_key(namespace, name, value, options)
//!     ↓
//! ValueCache::get  ── hit ──→ CacheItem (value or null)
//!     ↓ miss
//! resolve ... → ValueCache::set(key, Some(value) | None)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use value_cache::{KeyData, ValueCache, create_cache_key};
//!
//! let mut cache = ValueCache::default();
//! let key = create_cache_key(&KeyData::new("util", "splitValue", "a b"), &options);
//! if let Some(item) = cache.get(key.as_ref()) { ... }
//! cache.set(key.as_ref(), Some(vec!["a".to_owned(), "b".to_owned()]));
//! ```

#![forbid(unsafe_code)]

pub mod key;
pub mod storage;

pub use key::{CacheKey, KeyData, KeyOptions, create_cache_key};
pub use storage::{CacheItem, DEFAULT_CAPACITY, ValueCache};
