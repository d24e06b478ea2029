//! memd demo - cache-aside round trip against the in-process backend
//!
//! Runs a single-key and a batch get-or-populate round, then prints the
//! backend statistics as JSON.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memd::{spawn_cleanup_task, CacheClient, Client, Config, MemoryClient};

#[derive(Debug, Serialize, Deserialize)]
struct Profile {
    id: u64,
    name: String,
}

fn load_profile(key: &str) -> Profile {
    let id = key.trim_start_matches("profile:").parse().unwrap_or_default();
    Profile {
        id,
        name: format!("user-{}", id),
    }
}

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the in-process backend and start the expiration sweeper
/// 4. Run single-key and batch get-or-populate rounds
/// 5. Print backend statistics and stop the sweeper
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_expiration={}s, cleanup_interval={}s, serializer={}",
        config.max_entries, config.default_expiration, config.cleanup_interval, config.serializer
    );

    let backend = Arc::new(MemoryClient::from_config(&config));
    let cleanup_handle = spawn_cleanup_task(backend.clone(), config.cleanup_interval);

    let client = Client::with_serializer(backend.clone(), config.serializer);
    let exp = config.default_expiration;

    for _ in 0..2 {
        let item = client.get_or_set("profile:1", |key| {
            client.to_item(key, &load_profile(key), exp)
        })?;
        let profile: Profile = client.from_item(&item)?;
        info!("Single lookup: {:?}", profile);
    }

    let keys: Vec<String> = (1..=4).map(|i| format!("profile:{}", i)).collect();
    let outcome = client.get_or_set_multi(&keys, |missing| {
        let profiles: HashMap<&str, Profile> = missing
            .iter()
            .map(|key| (key.as_str(), load_profile(key)))
            .collect();
        Ok(client.to_item_map(profiles, exp)?)
    })?;
    info!(
        "Batch lookup: {} items, {} failed to cache",
        outcome.items.len(),
        outcome.failed_keys.len()
    );

    let hit = backend.get("profile:4").is_ok();
    info!("profile:4 cached after batch: {}", hit);

    let stats = backend.stats()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to render statistics")?
    );

    cleanup_handle.abort();
    info!("Demo complete");
    Ok(())
}
