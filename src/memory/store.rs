//! Memory Store Module
//!
//! HashMap storage combined with LRU tracking and memcached-style expiry.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::client::Item;
use crate::error::{CacheError, Result};
use crate::memory::{LruTracker, MemoryEntry, MemoryStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Memory Store ==
/// Single-threaded storage engine behind [`crate::memory::MemoryClient`].
#[derive(Debug)]
pub struct MemoryStore {
    entries: HashMap<String, MemoryEntry>,
    lru: LruTracker,
    stats: MemoryStats,
    max_entries: usize,
}

impl MemoryStore {
    /// Creates a store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: MemoryStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores an item, overwriting any previous value for its key.
    ///
    /// If the store is full, the least recently used entry is evicted.
    pub fn set(&mut self, item: &Item) -> Result<()> {
        validate_key(&item.key)?;

        if item.value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Backend(format!(
                "Value for {} exceeds maximum size of {} bytes",
                item.key, MAX_VALUE_SIZE
            )));
        }

        if self.max_entries == 0 {
            return Err(CacheError::Backend("Store has no capacity".to_string()));
        }

        let is_overwrite = self.entries.contains_key(&item.key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!("Evicted least recently used key: {}", evicted);
                }
                None => {
                    return Err(CacheError::Backend(
                        "Store is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        let entry = MemoryEntry::from_item(item, Utc::now());
        self.entries.insert(item.key.clone(), entry);
        self.lru.touch(&item.key);

        self.stats.record_set();
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a live item by key.
    ///
    /// Expired entries are removed and reported as [`CacheError::NotFound`].
    pub fn get(&mut self, key: &str) -> Result<Item> {
        validate_key(key)?;

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let item = entry.to_item(key);
                self.stats.record_hit();
                self.lru.touch(key);
                return Ok(item);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
        }
        self.stats.record_miss();
        Err(CacheError::NotFound(key.to_string()))
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.remove_entry(key) {
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Utc::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> MemoryStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}

// == Key Validation ==
/// Applies memcached key rules: non-empty, at most 250 bytes, no whitespace
/// or control characters.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::Backend("Key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::Backend(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CacheError::Backend(format!(
            "Key contains whitespace or control characters: {:?}",
            key
        )));
    }
    Ok(())
}
