use crate::core::cache::{CacheEntry, DEFAULT_TTL};
use crate::core::config::CacheConfig;
use crate::core::currency::{RateProvider, RateSnapshot, RateSource};
use crate::core::error::RateError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    /// Error of the most recent fetch, cleared by the next success.
    last_error: Option<RateError>,
}

/// Holds the process' single rate snapshot and refreshes it from `inner` once the
/// TTL has elapsed.
///
/// The lock is held across the fetch. Callers that queued behind a fetch take its
/// outcome, the new entry or its error, instead of fetching again.
pub struct CachingRateProvider<T: RateSource> {
    inner: T,
    ttl: Duration,
    serve_stale_on_error: bool,
    state: Mutex<CacheState>,
    /// Bumped under the lock each time a fetch completes.
    fetches: AtomicU64,
}

impl<T: RateSource> CachingRateProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            ttl: DEFAULT_TTL,
            serve_stale_on_error: false,
            state: Mutex::new(CacheState::default()),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn from_config(inner: T, config: &CacheConfig) -> Self {
        Self::new(inner)
            .with_ttl(config.ttl())
            .with_serve_stale_on_error(config.serve_stale_on_error)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Return an expired snapshot instead of an error when a refresh fails.
    pub fn with_serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    /// Age of the cached snapshot, if one has been fetched.
    pub async fn cached_age(&self) -> Option<Duration> {
        self.state.lock().await.entry.as_ref().map(CacheEntry::age)
    }

    /// Drops the cached snapshot so the next call fetches.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        debug!("Cache INVALIDATE");
        state.entry = None;
    }

    fn on_fetch_error(
        &self,
        state: &CacheState,
        e: RateError,
    ) -> Result<Arc<RateSnapshot>, RateError> {
        match state.entry.as_ref() {
            Some(stale) if self.serve_stale_on_error => {
                warn!(error = %e, age = ?stale.age(), "Refresh failed, serving stale exchange rates");
                Ok(stale.snapshot())
            }
            _ => Err(e),
        }
    }
}

#[async_trait]
impl<T: RateSource> RateProvider for CachingRateProvider<T> {
    async fn get_rates(&self) -> Result<Arc<RateSnapshot>, RateError> {
        let seen = self.fetches.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;
        match state.entry.as_ref() {
            Some(cached) if cached.is_fresh(self.ttl) => {
                debug!(age = ?cached.age(), "Cache HIT for exchange rates");
                return Ok(cached.snapshot());
            }
            Some(cached) => debug!(age = ?cached.age(), "Cache entry expired for exchange rates"),
            None => debug!("Cache MISS for exchange rates"),
        }

        // A fetch finished while we waited for the lock and it failed
        if self.fetches.load(Ordering::SeqCst) != seen {
            if let Some(e) = state.last_error.clone() {
                debug!(error = %e, "Sharing failed fetch with waiting caller");
                return self.on_fetch_error(&state, e);
            }
        }

        let result = self.inner.fetch_rates().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match result {
            Ok(snapshot) => {
                let fresh = CacheEntry::new(snapshot);
                let snapshot = fresh.snapshot();
                debug!("Cache PUT for exchange rates");
                state.entry = Some(fresh);
                state.last_error = None;
                Ok(snapshot)
            }
            Err(e) => {
                state.last_error = Some(e.clone());
                self.on_fetch_error(&state, e)
            }
        }
    }
}
