//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the in-process
//! backend.
//!
//! # Tasks
//! - Expiration Cleanup: Removes expired entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
