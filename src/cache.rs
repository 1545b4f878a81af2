//! Time-bounded answer memoization.
//!
//! Repeated questions are common on an FAQ widget (every visitor clicks the
//! same quick replies), so resolved answers are kept for a short freshness
//! window keyed by normalized question text. Entries are evicted lazily on
//! read and in bulk by [`ResponseCache::sweep`], which the orchestrator
//! triggers with low probability per resolution. Correctness never depends
//! on the sweep running; it only bounds memory growth.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::{AnswerPayload, CacheStats};

struct CacheEntry {
    payload: AnswerPayload,
    stored_at: Instant,
}

/// Concurrency-safe answer cache with a fixed freshness window.
///
/// Shared across all in-flight resolutions; last writer wins on identical
/// keys, which is acceptable because recomputation is idempotent.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a fresh entry. A stale entry behaves as absent and is evicted
    /// on the spot.
    pub fn lookup(&self, key: &str) -> Option<AnswerPayload> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn store(&self, key: &str, payload: AnswerPayload) {
        self.entries.lock().insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry older than the freshness window.
    pub fn sweep(&self) {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            count: entries.len(),
            keys: entries.keys().cloned().collect(),
        }
    }
}
