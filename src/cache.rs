use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};

/// Time source for the cache. Injectable so expiry can be tested without
/// sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Single-slot cache with a fixed validity window. Within the window,
/// `get_or_refresh` returns the stored value without invoking the loader;
/// after expiry the next call replaces the value wholesale. A failed refresh
/// propagates the error and leaves the slot for the next attempt.
pub struct TtlCache<T, C = SystemClock> {
    entry: Option<CacheEntry<T>>,
    ttl: Duration,
    clock: C,
}

impl<T> TtlCache<T, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<T, C: Clock> TtlCache<T, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entry: None,
            ttl,
            clock,
        }
    }

    /// Whether the stored value is still within its validity window.
    pub fn is_fresh(&self) -> bool {
        let now = self.clock.now();
        self.entry
            .as_ref()
            .is_some_and(|entry| now.duration_since(entry.fetched_at) < self.ttl)
    }

    pub async fn get_or_refresh<F, Fut>(&mut self, loader: F) -> Result<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let now = self.clock.now();

        if !self.is_fresh() {
            let value = loader().await?;
            self.entry = Some(CacheEntry {
                value,
                fetched_at: now,
            });
        }

        self.entry
            .as_ref()
            .map(|entry| &entry.value)
            .ok_or_else(|| anyhow::anyhow!("Cache refresh completed without a value"))
    }
}
