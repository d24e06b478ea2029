//! Memory Module
//!
//! In-process memcached-like backend with expiration and LRU eviction.
//! Implements [`CacheClient`] for tests, demos and single-process use.

mod entry;
mod lru;
mod stats;
mod store;


use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::client::{CacheClient, Item};
use crate::error::{CacheError, Result};

// Re-export public types
pub use entry::{resolve_expiration, MemoryEntry};
pub use lru::LruTracker;
pub use stats::MemoryStats;
pub use store::{validate_key, MemoryStore};

// == Public Constants ==
/// Maximum key length in bytes, as enforced by memcached
pub const MAX_KEY_LENGTH: usize = 250;

/// Maximum value size in bytes, memcached's default item size limit
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

// == Memory Client ==
/// Thread-safe in-process backend.
#[derive(Debug)]
pub struct MemoryClient {
    store: Mutex<MemoryStore>,
}

impl MemoryClient {
    /// Creates a backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Mutex::new(MemoryStore::new(max_entries)),
        }
    }

    /// Creates a backend sized from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_entries)
    }

    /// Removes an entry by key.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.delete(key)
    }

    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        Ok(self.lock()?.cleanup_expired())
    }

    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> Result<MemoryStats> {
        Ok(self.lock()?.stats())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryStore>> {
        self.store
            .lock()
            .map_err(|_| CacheError::Backend("Memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::from_config(&crate::config::Config::default())
    }
}

impl CacheClient for MemoryClient {
    fn get(&self, key: &str) -> Result<Item> {
        self.lock()?.get(key)
    }

    fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Item>> {
        let mut store = self.lock()?;
        let mut found = HashMap::new();
        for key in keys {
            match store.get(key) {
                Ok(item) => {
                    found.insert(key.clone(), item);
                }
                Err(CacheError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(found)
    }

    fn set(&self, item: &Item) -> Result<()> {
        self.lock()?.set(item)
    }

    fn set_multi(&self, items: &[Item]) -> Result<Vec<String>> {
        let mut store = self.lock()?;
        let mut failed = Vec::new();
        for item in items {
            if let Err(e) = store.set(item) {
                warn!("Failed to store {}: {}", item.key, e);
                failed.push(item.key.clone());
            }
        }
        Ok(failed)
    }
}
