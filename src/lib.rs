//! memd - cache-aside helpers for memcached clients
//!
//! Adds get-or-populate for single keys and batches, plus pluggable value
//! serialization, on top of any [`CacheClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod tasks;

pub use client::{CacheClient, Client, Item, Logger, MultiOutcome, Serializer};
pub use config::Config;
pub use error::{CacheError, Result, ToItemMapError};
pub use memory::MemoryClient;
pub use tasks::spawn_cleanup_task;
