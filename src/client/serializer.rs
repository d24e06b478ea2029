//! Serializer Module
//!
//! Swappable codecs turning values into stored payloads and back.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

// == Serializer ==
/// Codec used to encode values into item payloads.
///
/// Replacing the serializer on a client does not re-encode stored items;
/// reading an item written with another codec yields a decode error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Serializer {
    /// Self-describing JSON encoding
    #[default]
    Json,
    /// Compact binary encoding
    Bincode,
}

impl Serializer {
    // == Encode ==
    /// Encodes a value into a byte payload.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Serializer::Json => {
                serde_json::to_vec(value).map_err(|e| CacheError::Encode(e.to_string()))
            }
            Serializer::Bincode => {
                bincode::serialize(value).map_err(|e| CacheError::Encode(e.to_string()))
            }
        }
    }

    // == Decode ==
    /// Decodes a byte payload into a value.
    ///
    /// A zero-length payload is reported as [`CacheError::EmptyValue`]
    /// rather than a decode error.
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if bytes.is_empty() {
            return Err(CacheError::EmptyValue);
        }

        match self {
            Serializer::Json => {
                serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
            }
            Serializer::Bincode => {
                bincode::deserialize(bytes).map_err(|e| CacheError::Decode(e.to_string()))
            }
        }
    }

    /// Returns the configuration name of this serializer.
    pub fn name(&self) -> &'static str {
        match self {
            Serializer::Json => "json",
            Serializer::Bincode => "bincode",
        }
    }
}

impl fmt::Display for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Serializer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Serializer::Json),
            "bincode" => Ok(Serializer::Bincode),
            other => Err(format!("unknown serializer: {}", other)),
        }
    }
}
