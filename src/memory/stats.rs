//! Memory Statistics Module
//!
//! Hit, miss and eviction counters for the in-process backend.

use serde::Serialize;

// == Memory Stats ==
/// Counters describing backend activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Successful writes
    pub sets: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
