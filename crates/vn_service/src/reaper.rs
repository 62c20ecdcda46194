//! Periodic sweep of dead share records.
//!
//! Runs once at startup, then at a fixed interval (default hourly).  Every
//! predicate is a plain bulk delete; the loop holds no state between runs
//! and commutes with the self-healing deletes on the access paths, so it is
//! safe to skip, delay or run redundantly.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Notify};
use tracing::{debug, info, warn};

use vn_store::Store;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Handle returned to the caller so it can request an immediate sweep or
/// shut the loop down.
pub struct ReaperHandle {
    /// Notify to wake the loop early (e.g. after a bulk revoke).
    pub wake: Arc<Notify>,
    /// Send `true` to shut down.
    pub shutdown_tx: watch::Sender<bool>,
}

/// Spawn the reaper as a tokio task.  Returns a `JoinHandle` and a
/// `ReaperHandle` for control.
pub fn spawn_reaper(store: Store, interval: Duration) -> (tokio::task::JoinHandle<()>, ReaperHandle) {
    let wake = Arc::new(Notify::new());
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let wake_clone = wake.clone();

    let handle = tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "reaper started");

        // One immediate pass so a restart doesn't leave dead rows sitting
        // around until the first tick.
        sweep(&store).await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = wake_clone.notified() => {
                    debug!("reaper woken early");
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("reaper shutting down");
                        return;
                    }
                }
            }

            // Check shutdown again after wakeup.
            if *shutdown_rx.borrow() {
                return;
            }

            sweep(&store).await;
        }
    });

    (handle, ReaperHandle { wake, shutdown_tx })
}

/// One full sweep: expired links, exhausted links, expired exchange shares.
/// A failing predicate is logged and must not stop the others.
pub async fn sweep(store: &Store) {
    let now = Utc::now();

    match store.reap_expired_links(now).await {
        Ok(0) => {}
        Ok(deleted) => info!(deleted, "reaped expired share links"),
        Err(err) => warn!(%err, "failed to reap expired share links"),
    }

    match store.reap_exhausted_links().await {
        Ok(0) => {}
        Ok(deleted) => info!(deleted, "reaped exhausted share links"),
        Err(err) => warn!(%err, "failed to reap exhausted share links"),
    }

    match store.reap_expired_e2ee_shares(now).await {
        Ok(0) => {}
        Ok(deleted) => info!(deleted, "reaped expired exchange shares"),
        Err(err) => warn!(%err, "failed to reap expired exchange shares"),
    }
}
