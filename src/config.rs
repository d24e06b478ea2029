//! Configuration Module
//!
//! Handles loading client and backend configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::client::Serializer;

/// Configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-process backend can hold
    pub max_entries: usize,
    /// Expiration applied to items built by the demo, memcached-style
    pub default_expiration: i64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Codec used to encode cached values
    pub serializer: Serializer,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum backend entries (default: 1000)
    /// - `DEFAULT_EXPIRATION` - Item expiration in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `SERIALIZER` - `json` or `bincode` (default: json)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_expiration: parse_var("DEFAULT_EXPIRATION")
                .unwrap_or(defaults.default_expiration),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            serializer: parse_var("SERIALIZER").unwrap_or(defaults.serializer),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_expiration: 300,
            cleanup_interval: 1,
            serializer: Serializer::Json,
        }
    }
}
