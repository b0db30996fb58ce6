use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Default announcement interval for long-running operations
pub const DEFAULT_ANNOUNCE_INTERVAL: Duration = Duration::from_secs(3);

/// Upper bound on how long `stop` waits for the announcer to finish
const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Periodic liveness announcer for a long-running operation.
///
/// Announces through the log only; it carries no data back to the caller
/// and never affects the operation it instruments. `stop` guarantees the
/// announcer has ceased before returning, so log ordering relative to the
/// caller's next action is deterministic.
pub struct ProgressReporter {
    announced: Arc<AtomicU64>,
    running: Option<(watch::Sender<bool>, JoinHandle<()>)>,
}

impl ProgressReporter {
    /// Start announcing at the default interval
    pub fn start(label: &str, total: u64) -> Self {
        Self::with_interval(label, total, DEFAULT_ANNOUNCE_INTERVAL)
    }

    /// Start announcing at a custom interval
    pub fn with_interval(label: &str, total: u64, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let announced = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&announced);
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the
            // first announcement comes one full interval in
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        counter.fetch_add(1, Ordering::Relaxed);
                        info!(operation = %label, total, "still in progress");
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        Self {
            announced,
            running: Some((shutdown_tx, handle)),
        }
    }

    /// Number of announcements made so far
    pub fn announcements(&self) -> u64 {
        self.announced.load(Ordering::Relaxed)
    }

    /// Stop announcing. Idempotent. Returns only once the announcer task
    /// has finished (bounded wait, aborting on overrun), so no
    /// announcement is observable after this returns.
    pub async fn stop(&mut self) {
        if let Some((shutdown_tx, handle)) = self.running.take() {
            let _ = shutdown_tx.send(true);
            let abort = handle.abort_handle();
            if tokio::time::timeout(STOP_JOIN_TIMEOUT, handle).await.is_err() {
                abort.abort();
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // No orphaned timers if the caller never stopped
        if let Some((shutdown_tx, handle)) = self.running.take() {
            let _ = shutdown_tx.send(true);
            handle.abort();
        }
    }
}
