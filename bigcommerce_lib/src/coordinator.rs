//! Process-wide coordination of the per-store request quota.
//!
//! The platform enforces one quota per store, shared by every client of that
//! store. Fetch sessions targeting the same store share a [`StoreGate`]: when
//! any session sees the quota nearly exhausted it defers the gate, and every
//! session waits the deferral out before its next request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Owns one [`StoreGate`] per store hash. Create one per process and share
/// it through an `Arc`.
#[derive(Default)]
pub struct RateLimitCoordinator {
    gates: DashMap<String, Arc<StoreGate>>,
}

impl RateLimitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gate for `store`, creating it on first use.
    pub fn gate(&self, store: &str) -> Arc<StoreGate> {
        self.gates
            .entry(store.to_string())
            .or_insert_with(|| Arc::new(StoreGate::new(store)))
            .clone()
    }

    /// Snapshot of every store's request counters, sorted by store.
    pub fn summaries(&self) -> Vec<TrackerSummary> {
        let mut out: Vec<_> = self.gates.iter().map(|entry| entry.value().summary()).collect();
        out.sort_by(|a, b| a.store.cmp(&b.store));
        out
    }
}

/// Shared pause point for every request against one store.
pub struct StoreGate {
    store: String,
    resume_at: Mutex<Option<Instant>>,
    tracker: RequestTracker,
}

impl StoreGate {
    fn new(store: &str) -> Self {
        Self {
            store: store.to_string(),
            resume_at: Mutex::new(None),
            tracker: RequestTracker::default(),
        }
    }

    /// Wait until no deferral is pending, returning how long was waited.
    ///
    /// The lock is dropped while sleeping; a deferral extended by another
    /// session in the meantime is picked up on the next pass.
    pub async fn acquire(&self) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            let now = Instant::now();
            let wait = {
                let resume_at = self.resume_at.lock().await;
                match *resume_at {
                    Some(at) if at > now => at - now,
                    _ => break,
                }
            };
            sleep(wait).await;
            waited += wait;
        }
        if !waited.is_zero() {
            self.tracker.record_pause(waited);
        }
        waited
    }

    /// Hold every request against this store for at least `delay` from now.
    /// Never shortens a deferral already in place.
    pub async fn defer(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut resume_at = self.resume_at.lock().await;
        *resume_at = Some(match *resume_at {
            Some(at) if at > until => at,
            _ => until,
        });
    }

    /// Time left on the current deferral. `None` if the lock is contended.
    #[cfg(test)]
    fn pending_pause(&self) -> Option<Duration> {
        let resume_at = self.resume_at.try_lock().ok()?;
        let now = Instant::now();
        Some(match *resume_at {
            Some(at) if at > now => at - now,
            _ => Duration::ZERO,
        })
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn summary(&self) -> TrackerSummary {
        self.tracker.summary(&self.store)
    }
}

/// How one page request against a store ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    Throttled,
    Failed,
}

/// Per-store request accounting: outcomes, pauses and the tightest quota
/// seen.
pub struct RequestTracker {
    succeeded: AtomicU64,
    throttled: AtomicU64,
    failed: AtomicU64,
    pauses: AtomicU64,
    paused_ms: AtomicU64,
    /// `u64::MAX` until a response reports its remaining quota.
    lowest_requests_left: AtomicU64,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self {
            succeeded: AtomicU64::new(0),
            throttled: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            pauses: AtomicU64::new(0),
            paused_ms: AtomicU64::new(0),
            lowest_requests_left: AtomicU64::new(u64::MAX),
        }
    }
}

impl RequestTracker {
    pub fn record(&self, outcome: RequestOutcome) {
        let counter = match outcome {
            RequestOutcome::Succeeded => &self.succeeded,
            RequestOutcome::Throttled => &self.throttled,
            RequestOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Notes the `requests_left` reported by a response.
    pub fn observe_requests_left(&self, requests_left: u64) {
        self.lowest_requests_left
            .fetch_min(requests_left, Ordering::Relaxed);
    }

    pub fn record_pause(&self, duration: Duration) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
        self.paused_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    fn summary(&self, store: &str) -> TrackerSummary {
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let throttled = self.throttled.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let lowest = self.lowest_requests_left.load(Ordering::Relaxed);
        TrackerSummary {
            store: store.to_string(),
            requests: succeeded + throttled + failed,
            succeeded,
            throttled,
            failed,
            pauses: self.pauses.load(Ordering::Relaxed),
            paused_secs: self.paused_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            lowest_requests_left: (lowest != u64::MAX).then_some(lowest),
        }
    }
}

/// Request accounting for one store, as printed after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub store: String,
    pub requests: u64,
    pub succeeded: u64,
    pub throttled: u64,
    pub failed: u64,
    pub pauses: u64,
    pub paused_secs: f64,
    pub lowest_requests_left: Option<u64>,
}
