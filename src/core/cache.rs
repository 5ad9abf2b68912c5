use crate::core::currency::RateSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default validity window for a fetched snapshot.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// A rate snapshot paired with the instant it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    snapshot: Arc<RateSnapshot>,
    fetched_at: Instant,
}

impl CacheEntry {
    pub fn new(snapshot: RateSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            fetched_at: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Valid while strictly younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}
