//! Error types for the cache-aside client
//!
//! Provides unified error handling using thiserror.

use std::collections::HashMap;

use thiserror::Error;

use crate::client::Item;

// == Cache Error Enum ==
/// Unified error type for the cache-aside client and its backends.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in the backend (a cache miss)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Any other backend failure, on read or write
    #[error("Backend error: {0}")]
    Backend(String),

    /// Error returned by a caller-supplied populate callback
    #[error("Populate failed: {0}")]
    Populate(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The active serializer could not represent the value
    #[error("Encode error: {0}")]
    Encode(String),

    /// The stored payload is not valid for the active serializer
    #[error("Decode error: {0}")]
    Decode(String),

    /// The stored payload is zero-length
    #[error("Empty value")]
    EmptyValue,
}

impl CacheError {
    /// Wraps an arbitrary caller error raised inside a populate callback.
    pub fn populate<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        CacheError::Populate(err.into())
    }

    /// Returns true for a cache miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == To Item Map Error ==
/// Failure of a batch encode, carrying the items encoded before the failure.
#[derive(Error, Debug)]
#[error("Failed to encode item for {key}: {source}")]
pub struct ToItemMapError {
    /// Key whose value failed to encode
    pub key: String,
    /// Items successfully encoded before the failure
    pub items: HashMap<String, Item>,
    #[source]
    pub source: CacheError,
}

impl From<ToItemMapError> for CacheError {
    fn from(err: ToItemMapError) -> Self {
        err.source
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
