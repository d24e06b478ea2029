//! Cache-Aside Client
//!
//! Wraps a [`CacheClient`] with get-or-populate operations and value
//! serialization helpers.

use std::collections::{HashMap, HashSet};
use std::ops::Deref;

use serde::{de::DeserializeOwned, Serialize};

use crate::client::{CacheClient, Item, Logger, Serializer};
use crate::error::{CacheError, Result, ToItemMapError};

// == Multi Outcome ==
/// Result of a batch get-or-populate call.
#[derive(Debug, Clone, Default)]
pub struct MultiOutcome {
    /// Cached items plus items produced by the populate callback
    pub items: HashMap<String, Item>,
    /// Keys produced by the callback that could not be written back
    pub failed_keys: Vec<String>,
}

impl MultiOutcome {
    /// Returns true if every populated item was written back to the cache.
    pub fn is_fully_cached(&self) -> bool {
        self.failed_keys.is_empty()
    }
}

// == Client ==
/// Cache-aside layer over a memcached client.
///
/// The wrapped client stays reachable through `Deref`, so plain
/// `get`/`set` calls work on a `Client` directly. The layer holds no state
/// besides its serializer and logger; concurrent calls for the same missing
/// key each run their populate callback and the last write wins.
#[derive(Debug)]
pub struct Client<C> {
    backend: C,
    logger: Logger,
    serializer: Serializer,
}

impl<C: CacheClient> Client<C> {
    // == Constructor ==
    /// Creates a client using the JSON serializer and a `tracing` logger.
    pub fn new(backend: C) -> Self {
        Self::with_serializer(backend, Serializer::default())
    }

    /// Creates a client using the given serializer.
    pub fn with_serializer(backend: C, serializer: Serializer) -> Self {
        Self {
            backend,
            logger: Logger::default(),
            serializer,
        }
    }

    // == Configuration ==
    /// Replaces the log sink used for subsequent calls.
    pub fn set_logger(&mut self, logger: Logger) -> &mut Self {
        self.logger = logger;
        self
    }

    /// Replaces the serializer used for subsequent calls.
    ///
    /// Already-stored items keep their original encoding.
    pub fn set_serializer(&mut self, serializer: Serializer) -> &mut Self {
        self.serializer = serializer;
        self
    }

    /// Returns the active serializer.
    pub fn serializer(&self) -> Serializer {
        self.serializer
    }

    /// Returns the wrapped memcached client.
    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Consumes the wrapper, returning the memcached client.
    pub fn into_inner(self) -> C {
        self.backend
    }

    // == Get Or Set ==
    /// Reads `key` from the cache; on a miss, builds the item with
    /// `populate`, stores it, and returns it.
    ///
    /// `populate` runs at most once and only on a genuine miss. Any other
    /// read error is returned without calling it. Errors from `populate` and
    /// from the write-back are returned as-is.
    pub fn get_or_set<F>(&self, key: &str, populate: F) -> Result<Item>
    where
        F: FnOnce(&str) -> Result<Item>,
    {
        match self.backend.get(key) {
            Ok(item) => {
                self.logger.log(format_args!("hit: {}", key));
                return Ok(item);
            }
            Err(CacheError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        self.logger.log(format_args!("no hit: {}", key));
        let item = populate(key)?;
        self.backend.set(&item)?;
        Ok(item)
    }

    // == Get Or Set Multi ==
    /// Reads `keys` from the cache in one batch; the keys that missed are
    /// handed to `populate` (once, in input order) and its items are stored
    /// in one batch and merged into the result.
    ///
    /// Keys that `populate` does not return are absent from the result.
    /// Write-back failures do not fail the call: they are logged and listed
    /// in [`MultiOutcome::failed_keys`].
    pub fn get_or_set_multi<F>(&self, keys: &[String], populate: F) -> Result<MultiOutcome>
    where
        F: FnOnce(&[String]) -> Result<HashMap<String, Item>>,
    {
        let mut items = match self.backend.get_multi(keys) {
            Ok(items) => items,
            Err(CacheError::NotFound(_)) => HashMap::new(),
            Err(e) => return Err(e),
        };

        let (hit_keys, miss_keys) = partition_keys(keys, &items);
        self.logger.log(format_args!("hit keys: {:?}", hit_keys));
        self.logger.log(format_args!("remain keys: {:?}", miss_keys));

        if miss_keys.is_empty() {
            return Ok(MultiOutcome {
                items,
                failed_keys: Vec::new(),
            });
        }

        let populated = populate(&miss_keys)?;
        if populated.is_empty() {
            return Ok(MultiOutcome {
                items,
                failed_keys: Vec::new(),
            });
        }

        let to_store: Vec<Item> = populated.values().cloned().collect();
        items.extend(populated);

        let failed_keys = match self.backend.set_multi(&to_store) {
            Ok(failed) => failed,
            Err(e) => {
                self.logger.log(format_args!("set multi failed: {}", e));
                to_store.into_iter().map(|item| item.key).collect()
            }
        };
        if !failed_keys.is_empty() {
            self.logger.log(format_args!("failed keys: {:?}", failed_keys));
        }

        Ok(MultiOutcome { items, failed_keys })
    }

    // == Serialization Helpers ==
    /// Encodes `value` with the active serializer into a ready-to-store item.
    pub fn to_item<T>(&self, key: impl Into<String>, value: &T, expiration: i64) -> Result<Item>
    where
        T: Serialize + ?Sized,
    {
        let payload = self.serializer.encode(value)?;
        Ok(Item::new(key, payload, expiration))
    }

    /// Decodes an item's payload with the active serializer.
    ///
    /// Fails with [`CacheError::EmptyValue`] on a zero-length payload.
    pub fn from_item<T>(&self, item: &Item) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.serializer.decode(&item.value)
    }

    /// Encodes every `(key, value)` pair into an item map.
    ///
    /// Stops at the first encode failure; the error carries the items
    /// encoded so far.
    pub fn to_item_map<I, K, V>(
        &self,
        values: I,
        expiration: i64,
    ) -> std::result::Result<HashMap<String, Item>, ToItemMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let mut items = HashMap::new();
        for (key, value) in values {
            let key = key.into();
            match self.to_item(key.clone(), &value, expiration) {
                Ok(item) => {
                    items.insert(key, item);
                }
                Err(source) => return Err(ToItemMapError { key, items, source }),
            }
        }
        Ok(items)
    }
}

impl<C> Deref for Client<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.backend
    }
}

// == Key Partitioning ==
/// Splits `keys` into those present in `found` and those absent, keeping
/// input order and dropping repeats.
fn partition_keys(keys: &[String], found: &HashMap<String, Item>) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    let mut misses = Vec::new();

    for key in keys {
        if !seen.insert(key.as_str()) {
            continue;
        }
        if found.contains_key(key) {
            hits.push(key.clone());
        } else {
            misses.push(key.clone());
        }
    }

    (hits, misses)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryClient;
    use serde::Deserialize;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Hoge {
        #[serde(rename = "hoge")]
        piyo: i64,
        fuga: String,
    }

    fn hoge(piyo: i64, fuga: &str) -> Hoge {
        Hoge {
            piyo,
            fuga: fuga.to_string(),
        }
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn create_test_client() -> Client<MemoryClient> {
        let mut client = Client::new(MemoryClient::new(100));
        client.set_logger(Logger::noop());
        client
    }

    #[test]
    fn test_partition_keys_preserves_order_and_dedups() {
        let mut found = HashMap::new();
        found.insert("b".to_string(), Item::new("b", b"1".to_vec(), 0));

        let (hits, misses) = partition_keys(&keys(&["c", "b", "a", "c", "b"]), &found);

        assert_eq!(hits, keys(&["b"]));
        assert_eq!(misses, keys(&["c", "a"]));
    }

    #[test]
    fn test_get_or_set_miss_then_hit() {
        let client = create_test_client();
        let calls = Cell::new(0);

        let item = client
            .get_or_set("key1", |key| {
                calls.set(calls.get() + 1);
                client.to_item(key, &hoge(1, "aaa"), 60)
            })
            .unwrap();
        let value: Hoge = client.from_item(&item).unwrap();
        assert_eq!(value, hoge(1, "aaa"));

        let item = client
            .get_or_set("key1", |key| {
                calls.set(calls.get() + 1);
                client.to_item(key, &Hoge::default(), 60)
            })
            .unwrap();
        let value: Hoge = client.from_item(&item).unwrap();
        assert_eq!(value, hoge(1, "aaa"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_get_or_set_populate_error_is_not_cached() {
        let client = create_test_client();

        let result = client.get_or_set("key1", |_| Err(CacheError::populate("source down")));
        assert!(matches!(result, Err(CacheError::Populate(_))));

        assert!(matches!(client.get("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_get_or_set_multi_partial_hit() {
        let client = create_test_client();
        client.set(&client.to_item("key1", &hoge(1, "aaa"), 60).unwrap()).unwrap();

        let requested = Mutex::new(Vec::new());
        let outcome = client
            .get_or_set_multi(&keys(&["key1", "key2"]), |missing| {
                requested.lock().unwrap().extend_from_slice(missing);
                Ok(client.to_item_map(missing.iter().map(|k| (k.clone(), hoge(2, "bbb"))), 60)?)
            })
            .unwrap();

        assert_eq!(*requested.lock().unwrap(), keys(&["key2"]));
        assert_eq!(outcome.items.len(), 2);
        assert!(outcome.is_fully_cached());

        let key1: Hoge = client.from_item(&outcome.items["key1"]).unwrap();
        let key2: Hoge = client.from_item(&outcome.items["key2"]).unwrap();
        assert_eq!(key1, hoge(1, "aaa"));
        assert_eq!(key2, hoge(2, "bbb"));

        assert!(client.get("key2").is_ok());
    }

    #[test]
    fn test_get_or_set_multi_all_hit_skips_populate() {
        let client = create_test_client();
        for key in ["key1", "key2"] {
            client.set(&client.to_item(key, &hoge(1, "aaa"), 60).unwrap()).unwrap();
        }

        let outcome = client
            .get_or_set_multi(&keys(&["key1", "key2"]), |_| {
                panic!("populate must not run when every key hits")
            })
            .unwrap();

        assert_eq!(outcome.items.len(), 2);
    }

    #[test]
    fn test_get_or_set_multi_dropped_key_is_absent() {
        let client = create_test_client();

        let outcome = client
            .get_or_set_multi(&keys(&["key1", "key2"]), |_| {
                Ok(client.to_item_map([("key1", hoge(1, "aaa"))], 60)?)
            })
            .unwrap();

        assert_eq!(outcome.items.len(), 1);
        assert!(outcome.items.contains_key("key1"));
        assert!(!outcome.items.contains_key("key2"));
        assert!(matches!(client.get("key2"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_set_logger_replaces_sink() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let mut client = create_test_client();
        client.set_logger(Logger::new(move |args| {
            sink.lock().unwrap().push(args.to_string())
        }));

        client
            .get_or_set("key1", |key| client.to_item(key, &1, 60))
            .unwrap();
        client
            .get_or_set("key1", |key| client.to_item(key, &2, 60))
            .unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["no hit: key1", "hit: key1"]);
    }

    #[test]
    fn test_set_serializer_affects_new_items_only() {
        let mut client = create_test_client();
        let json_item = client.to_item("key1", &hoge(1, "aaa"), 60).unwrap();

        client.set_serializer(Serializer::Bincode);
        assert_eq!(client.serializer(), Serializer::Bincode);

        let result: Result<Hoge> = client.from_item(&json_item);
        assert!(matches!(result, Err(CacheError::Decode(_))));

        let bin_item = client.to_item("key1", &hoge(1, "aaa"), 60).unwrap();
        let value: Hoge = client.from_item(&bin_item).unwrap();
        assert_eq!(value, hoge(1, "aaa"));
    }

    #[test]
    fn test_from_item_empty_payload() {
        let client = create_test_client();
        let result: Result<Hoge> = client.from_item(&Item::new("key1", Vec::new(), 0));
        assert!(matches!(result, Err(CacheError::EmptyValue)));
    }

    #[test]
    fn test_to_item_map_stops_at_first_failure() {
        let client = create_test_client();
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);

        let values = vec![
            ("a", serde_json::json!(1)),
            ("b", serde_json::to_value(hoge(2, "bbb")).unwrap()),
        ];
        let ok = client.to_item_map(values, 60).unwrap();
        assert_eq!(ok.len(), 2);

        let mixed: Vec<(&str, Option<&HashMap<(i32, i32), i32>>)> =
            vec![("a", None), ("b", Some(&bad)), ("c", None)];
        let err = client.to_item_map(mixed, 60).unwrap_err();
        assert_eq!(err.key, "b");
        assert_eq!(err.items.len(), 1);
        assert!(err.items.contains_key("a"));
        assert!(matches!(err.source, CacheError::Encode(_)));
    }

    #[test]
    fn test_deref_and_into_inner() {
        let client = create_test_client();
        client.set(&Item::new("raw", b"\"x\"".to_vec(), 0)).unwrap();
        assert_eq!(client.backend().get("raw").unwrap().value, b"\"x\"");

        let backend = client.into_inner();
        assert!(backend.get("raw").is_ok());
    }
}
