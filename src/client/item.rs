//! Cache Item Module
//!
//! Defines the key/payload/expiration tuple exchanged with the backend.

// == Constants ==
/// Largest expiration still interpreted as relative seconds (30 days).
/// Larger values are absolute Unix timestamps, as in memcached.
pub const MAX_RELATIVE_EXPIRATION: i64 = 60 * 60 * 24 * 30;

// == Item ==
/// A single cache entry as stored in the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The cache key
    pub key: String,
    /// Opaque payload produced by a serializer
    pub value: Vec<u8>,
    /// Memcached-style expiration: 0 = never, up to 30 days = relative
    /// seconds, above that = absolute Unix timestamp, negative = expired
    pub expiration: i64,
}

impl Item {
    // == Constructor ==
    /// Creates a new item from raw parts.
    pub fn new(key: impl Into<String>, value: Vec<u8>, expiration: i64) -> Self {
        Self {
            key: key.into(),
            value,
            expiration,
        }
    }

    /// Returns true if the payload is zero-length.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
