//! Memory Entry Module
//!
//! Stored payload plus the absolute expiry derived from a memcached-style
//! expiration value.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::client::{Item, MAX_RELATIVE_EXPIRATION};

// == Memory Entry ==
/// A single entry held by the in-process backend.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// The stored payload
    pub value: Vec<u8>,
    /// Expiration exactly as supplied by the writer
    pub expiration: i64,
    /// Time the entry was written
    pub created_at: DateTime<Utc>,
    /// Absolute expiry, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl MemoryEntry {
    // == Constructor ==
    /// Creates an entry from an item, resolving its expiration against `now`.
    pub fn from_item(item: &Item, now: DateTime<Utc>) -> Self {
        Self {
            value: item.value.clone(),
            expiration: item.expiration,
            created_at: now,
            expires_at: resolve_expiration(item.expiration, now),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Rebuilds the item this entry was created from.
    pub fn to_item(&self, key: &str) -> Item {
        Item::new(key, self.value.clone(), self.expiration)
    }
}

// == Expiration ==
/// Converts a memcached-style expiration into an absolute instant.
///
/// - `0`: never expires
/// - negative: already expired
/// - up to 30 days: seconds relative to `now`
/// - above: absolute Unix timestamp in seconds
pub fn resolve_expiration(expiration: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match expiration {
        0 => None,
        e if e < 0 => Some(now),
        e if e <= MAX_RELATIVE_EXPIRATION => Some(now + Duration::seconds(e)),
        e => Some(Utc.timestamp_opt(e, 0).single().unwrap_or(now)),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn item(expiration: i64) -> Item {
        Item::new("key1", b"value".to_vec(), expiration)
    }

    #[test]
    fn test_entry_no_expiration() {
        let entry = MemoryEntry::from_item(&item(0), Utc::now());

        assert_eq!(entry.value, b"value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_relative_expiration() {
        let now = Utc::now();
        let entry = MemoryEntry::from_item(&item(60), now);

        assert_eq!(entry.expires_at, Some(now + Duration::seconds(60)));
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_entry_absolute_expiration() {
        let now = Utc::now();
        let future = now.timestamp() + MAX_RELATIVE_EXPIRATION + 10;
        let entry = MemoryEntry::from_item(&item(future), now);

        assert_eq!(entry.expires_at.unwrap().timestamp(), future);
        assert!(!entry.is_expired_at(now));
    }

    #[test]
    fn test_entry_absolute_expiration_in_past() {
        let now = Utc::now();
        let entry = MemoryEntry::from_item(&item(MAX_RELATIVE_EXPIRATION + 1), now);

        assert!(entry.is_expired_at(now));
    }

    #[test]
    fn test_entry_negative_expiration() {
        let entry = MemoryEntry::from_item(&item(-1), Utc::now());
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_expiration_elapses() {
        let entry = MemoryEntry::from_item(&item(1), Utc::now());
        assert!(!entry.is_expired());

        sleep(std::time::Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_to_item_keeps_original_expiration() {
        let entry = MemoryEntry::from_item(&item(60), Utc::now());
        assert_eq!(entry.to_item("key1"), item(60));
    }
}
