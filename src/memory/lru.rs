//! LRU Tracker Module
//!
//! Least-recently-used ordering for capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    tick: u64,
    by_tick: BTreeMap<u64, String>,
    by_key: HashMap<String, u64>,
}

impl LruTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        self.tick += 1;
        if let Some(old) = self.by_key.insert(key.to_string(), self.tick) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(self.tick, key.to_string());
    }

    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
