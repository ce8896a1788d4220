use std::time::Duration;

use moka::{future::Cache, policy::EvictionPolicy};

/// Bounded, time-expiring set of consumed nonces.
///
/// Each entry lives for the configured TTL from insertion. When the cache
/// is at capacity, least-recently-inserted entries are evicted to admit new
/// ones; capacity pressure never rejects a candidate, so a legitimate burst
/// cannot be turned into a denial of service.
#[derive(Clone)]
pub struct NonceCache {
    seen: Cache<String, ()>,
}

impl NonceCache {
    /// Creates a new `NonceCache`.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of live entries.
    /// * `ttl` - How long an accepted nonce stays consumed.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let seen = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { seen }
    }

    /// Atomically records a nonce if it has not been seen within the TTL.
    ///
    /// Returns `true` when the nonce was newly inserted (accepted) and
    /// `false` when it was already present (replay). Two requests racing
    /// with the same nonce resolve to exactly one acceptance.
    pub async fn insert_if_absent(&self, nonce: &str) -> bool {
        self.seen.entry_by_ref(nonce).or_insert(()).await.is_fresh()
    }

    #[cfg(test)]
    async fn run_pending_tasks(&self) {
        self.seen.run_pending_tasks().await;
    }
}
