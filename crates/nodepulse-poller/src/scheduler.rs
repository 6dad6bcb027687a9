//! Poll scheduler — drives the pipeline on a fixed interval.
//!
//! The first cycle fires immediately. Cycles never overlap: the loop
//! awaits each cycle before taking the next tick, missed ticks are
//! skipped rather than bunched up, and [`Poller::try_poll`] refuses to
//! start while another cycle holds the permit.
//!
//! Shutdown wins over a pending tick: once signalled, no new cycle starts,
//! and only the cycle already in flight is allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::MIN_POLL_INTERVAL;
use crate::poller::Poller;

/// Periodic driver for a [`Poller`].
pub struct PollScheduler {
    poller: Arc<Poller>,
    interval: Duration,
}

impl PollScheduler {
    /// Intervals shorter than [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(poller: Arc<Poller>, interval: Duration) -> Self {
        let interval = if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                min_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "poll interval below minimum, clamping"
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };
        Self { poller, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the poll loop on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// Run the poll loop until shutdown signal.
    ///
    /// A cycle in progress when shutdown arrives is allowed to finish.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "poll scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    info!("poll scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        info!("poll scheduler shutting down");
                        break;
                    }
                    if self.poller.try_poll().await.is_none() {
                        debug!("tick skipped, previous cycle still in flight");
                    }
                }
            }
        }
    }
}
