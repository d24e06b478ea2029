//! Client Module
//!
//! Cache-aside helpers layered over a memcached client: get-or-populate for
//! single keys and batches, plus pluggable value serialization.

mod backend;
mod facade;
mod item;
mod logger;
mod serializer;


// Re-export public types
pub use backend::CacheClient;
pub use facade::{Client, MultiOutcome};
pub use item::{Item, MAX_RELATIVE_EXPIRATION};
pub use logger::Logger;
pub use serializer::Serializer;
