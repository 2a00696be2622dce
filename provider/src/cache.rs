//! Local cache of resolved flag values.

use dashmap::DashMap;
use flag_core::FlagValue;

/// Shared in-process cache mapping flag keys to resolved values.
///
/// Entries have no TTL; they live until an invalidation notification
/// evicts them. Individual operations are atomic, but no cross-call
/// locking is provided: two concurrent misses for the same key may both
/// fetch and both insert, and the last insert wins.
#[derive(Default)]
pub struct FlagCache {
    entries: DashMap<String, FlagValue>,
}

impl FlagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<FlagValue> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: &str, value: FlagValue) {
        self.entries.insert(key.to_string(), value);
    }

    /// Removes the entry for `key`, returning whether one was present.
    /// Evicting a missing key is a no-op.
    pub fn evict(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
