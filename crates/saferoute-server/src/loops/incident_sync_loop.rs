//! Periodic refresh of crowd-reported incidents.
//!
//! Replaces the catalog whenever a fetch succeeds. A failed fetch keeps the
//! previous incidents in place and reschedules itself through
//! [`SyncSchedule`].

use rand::Rng;
use saferoute_providers::IncidentSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::state::AppState;

/// First retry after a failure never waits longer than this.
const RETRY_FLOOR: Duration = Duration::from_secs(5);
/// A long outage backs off to at most this many sync intervals.
const MAX_INTERVALS_BETWEEN_RETRIES: u32 = 4;
/// Jitter added on retries, as a fraction of the delay.
const RETRY_JITTER: f64 = 0.2;

/// When to fetch incidents next.
///
/// Healthy syncs run every `interval`. After a failure the store is retried
/// quickly, then at doubling delays capped at a few intervals.
#[derive(Debug, Clone)]
pub struct SyncSchedule {
    interval: Duration,
    failures: u32,
}

impl SyncSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_secs(1)),
            failures: 0,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consecutive failed fetches since the last success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn after_success(&mut self) -> Duration {
        self.failures = 0;
        self.interval
    }

    pub fn after_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        with_jitter(self.retry_delay())
    }

    /// Retry delay before jitter.
    fn retry_delay(&self) -> Duration {
        let first = self.interval.min(RETRY_FLOOR);
        let doublings = self.failures.saturating_sub(1).min(16);
        let ceiling = self.interval.saturating_mul(MAX_INTERVALS_BETWEEN_RETRIES);
        first.saturating_mul(1 << doublings).min(ceiling)
    }
}

fn with_jitter(delay: Duration) -> Duration {
    let max_ms = (delay.as_millis() as f64 * RETRY_JITTER) as u64;
    if max_ms == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// Fetch incidents once and return the delay before the next fetch.
pub async fn sync_once(
    state: &AppState,
    source: &dyn IncidentSource,
    schedule: &mut SyncSchedule,
) -> Duration {
    match source.fetch_incidents().await {
        Ok(incidents) => {
            let count = incidents.len();
            let snapshot = state.set_incident_records(incidents);
            tracing::debug!(
                "Synced {} incident reports into catalog generation {}",
                count,
                snapshot.generation
            );
            schedule.after_success()
        }
        Err(err) => {
            let delay = schedule.after_failure();
            tracing::warn!(
                "Incident sync failed ({} in a row): {} (next attempt in {:?})",
                schedule.failures(),
                err,
                delay
            );
            delay
        }
    }
}

/// Start the incident sync loop. Returns immediately when no store is configured.
pub async fn run_incident_sync_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let Some(source) = state.incident_source() else {
        tracing::info!("Incident store not configured; sync loop disabled");
        return;
    };

    let mut schedule = SyncSchedule::from_secs(state.config().incident_sync_secs);
    let mut next = Duration::ZERO;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Incident sync loop shutting down");
                break;
            }
            _ = tokio::time::sleep(next) => {
                next = sync_once(&state, source.as_ref(), &mut schedule).await;
            }
        }
    }
}
