//! Backend Module
//!
//! The memcached client operations the cache-aside layer relies on.

use std::collections::HashMap;
use std::sync::Arc;

use crate::client::Item;
use crate::error::Result;

// == Cache Client ==
/// Operations required from an underlying memcached client.
///
/// Implementations must be safe for concurrent use; the cache-aside layer
/// performs no locking of its own.
pub trait CacheClient: Send + Sync {
    /// Reads a single item.
    ///
    /// A miss must be reported as [`crate::CacheError::NotFound`] so it can be
    /// told apart from other failures.
    fn get(&self, key: &str) -> Result<Item>;

    /// Reads several items at once, returning only the keys found.
    ///
    /// Missing keys are simply absent from the map; an error is reserved for
    /// failures of the whole call.
    fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Item>>;

    /// Stores an item, overwriting any previous value.
    fn set(&self, item: &Item) -> Result<()>;

    /// Stores several items, returning the keys that failed to store.
    ///
    /// A non-empty list of failed keys is not an error of the batch call.
    fn set_multi(&self, items: &[Item]) -> Result<Vec<String>>;
}

impl<C: CacheClient + ?Sized> CacheClient for Arc<C> {
    fn get(&self, key: &str) -> Result<Item> {
        (**self).get(key)
    }

    fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Item>> {
        (**self).get_multi(keys)
    }

    fn set(&self, item: &Item) -> Result<()> {
        (**self).set(item)
    }

    fn set_multi(&self, items: &[Item]) -> Result<Vec<String>> {
        (**self).set_multi(items)
    }
}
