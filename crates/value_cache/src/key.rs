//! Cache key construction.
//!
//! A key is the JSON serialization of `{namespace, name, value, opt}`. Options
//! serialize their maps in sorted order, so structurally equal requests always
//! produce the same string and requests that differ in any field never
//! collide.

use core::fmt;
use log::warn;
use serde::Serialize;

/// Options that take part in a cache key.
///
/// Options holding opaque callbacks cannot be keyed: the callback may answer
/// differently between calls, so such requests are never memoized.
pub trait KeyOptions: Serialize {
    /// Whether results computed under these options may be memoized.
    fn is_cacheable(&self) -> bool;
}

/// Identifies the operation and subject of a cached computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KeyData<'key> {
    /// Partition tag of the originating module (e.g. `"css-var"`).
    pub namespace: &'key str,
    /// Operation name within the namespace (e.g. `"resolveVar"`).
    pub name: &'key str,
    /// The value being resolved.
    pub value: &'key str,
}

impl<'key> KeyData<'key> {
    #[inline]
    pub const fn new(namespace: &'key str, name: &'key str, value: &'key str) -> Self {
        Self {
            namespace,
            name,
            value,
        }
    }
}

/// A canonical cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct KeyRecord<'key, O: Serialize + ?Sized> {
    #[serde(flatten)]
    data: KeyData<'key>,
    opt: &'key O,
}

/// Build the cache key for `key_data` resolved under `opt`.
///
/// Returns `None` when the options are not cacheable or cannot be
/// serialized; callers then skip both the lookup and the write.
pub fn create_cache_key<O: KeyOptions + ?Sized>(key_data: &KeyData<'_>, opt: &O) -> Option<CacheKey> {
    if !opt.is_cacheable() {
        return None;
    }
    let record = KeyRecord {
        data: *key_data,
        opt,
    };
    match serde_json::to_string(&record) {
        Ok(text) => Some(CacheKey(text)),
        Err(error) => {
            warn!(
                "[CACHE] could not serialize key for {}::{}: {error}",
                key_data.namespace, key_data.name
            );
            None
        }
    }
}
