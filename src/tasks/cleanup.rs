//! Expiration Cleanup Task
//!
//! Background task that periodically removes expired entries from the
//! in-process backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::memory::MemoryClient;

/// Spawns a background task that periodically sweeps expired entries.
///
/// Expired entries are already invisible to reads; the sweep only reclaims
/// their memory. The returned handle can be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryClient::new(1000));
/// let cleanup_handle = spawn_cleanup_task(backend.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(backend: Arc<MemoryClient>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiration cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match backend.cleanup_expired() {
                Ok(0) => debug!("Expiration cleanup: no expired entries found"),
                Ok(removed) => info!("Expiration cleanup: removed {} expired entries", removed),
                Err(e) => {
                    warn!("Expiration cleanup stopped: {}", e);
                    break;
                }
            }
        }
    })
}
