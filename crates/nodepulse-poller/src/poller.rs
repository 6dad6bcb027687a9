//! Poll pipeline — one cycle from upstream calls to a published snapshot.
//!
//! A cycle resolves groups, fetches status, classifies, and replaces the
//! snapshot. It never fails: every branch ends in exactly one write to
//! the [`SnapshotStore`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use nodepulse_state::{IgnoreSet, NodeGroupMap, PollSnapshot, SnapshotStore};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::classifier::{Classification, classify};
use crate::config::PollerConfig;
use crate::fetcher::{FetchOutcome, fetch_status};
use crate::groups::resolve_groups;
use crate::outcome::Outcome;
use crate::rpc::{RpcClient, RpcError};

/// Runs poll cycles against one upstream and publishes the results.
pub struct Poller {
    client: RpcClient,
    ignore: IgnoreSet,
    store: SnapshotStore,
    /// Size-1 guard: at most one cycle writes at a time.
    in_flight: Semaphore,
}

impl Poller {
    /// Create a poller that publishes into `store`.
    pub fn new(config: &PollerConfig, store: SnapshotStore) -> Result<Self, RpcError> {
        Ok(Self {
            client: RpcClient::new(config)?,
            ignore: config.ignore_groups.clone(),
            store,
            in_flight: Semaphore::new(1),
        })
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run a cycle unless one is already in flight.
    ///
    /// Returns `None` when the call was skipped.
    pub async fn try_poll(&self) -> Option<Outcome> {
        let Ok(_permit) = self.in_flight.try_acquire() else {
            debug!("poll cycle still running, skipping tick");
            return None;
        };
        Some(self.run_cycle().await)
    }

    /// Run a cycle, waiting for any in-flight one to finish first.
    pub async fn poll_once(&self) -> Outcome {
        // The semaphore is never closed.
        let _permit = self.in_flight.acquire().await.ok();
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> Outcome {
        let started = Instant::now();

        let groups = resolve_groups(&self.client).await.into_map();
        let fetched = fetch_status(&self.client).await;

        let previous = self.store.read().await;
        let (next, outcome) = next_snapshot(&previous, fetched, &groups, &self.ignore, Utc::now());

        let summary = &next.nodes_online_summary;
        debug!(
            %outcome,
            status = next.computed_base_status,
            total = summary.total_nodes,
            online = summary.online_count,
            offline = summary.offline_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "poll cycle complete"
        );

        if next.computed_base_status != previous.computed_base_status {
            if next.computed_base_status == 200 {
                info!(%outcome, from = previous.computed_base_status, "base status recovered");
            } else {
                warn!(
                    %outcome,
                    from = previous.computed_base_status,
                    to = next.computed_base_status,
                    "base status changed"
                );
            }
        }

        self.store.replace(next).await;
        outcome
    }
}

/// Derive the next snapshot from the previous one and this cycle's fetch.
///
/// Error branches carry the previous node summary forward; only a
/// classified body rewrites it. Transport failures also keep the
/// previous upstream HTTP status.
pub fn next_snapshot(
    previous: &PollSnapshot,
    fetched: FetchOutcome,
    groups: &NodeGroupMap,
    ignore: &IgnoreSet,
    checked_at: DateTime<Utc>,
) -> (PollSnapshot, Outcome) {
    match fetched {
        FetchOutcome::TransportFailed(error) => (
            PollSnapshot {
                last_checked_at: Some(checked_at),
                rpc_error: None,
                fetch_error: Some(error),
                computed_base_status: Outcome::FetchFailed.base_status(),
                ..previous.clone()
            },
            Outcome::FetchFailed,
        ),
        FetchOutcome::HttpError {
            http_status,
            outcome,
        } => (
            PollSnapshot {
                last_checked_at: Some(checked_at),
                upstream_http_status: Some(http_status),
                rpc_error: None,
                fetch_error: None,
                computed_base_status: outcome.base_status(),
                ..previous.clone()
            },
            outcome,
        ),
        FetchOutcome::Body(body) => match classify(&body, groups, ignore) {
            Classification::RpcError { error, outcome } => (
                PollSnapshot {
                    last_checked_at: Some(checked_at),
                    upstream_http_status: Some(200),
                    rpc_error: Some(error),
                    fetch_error: None,
                    computed_base_status: outcome.base_status(),
                    ..previous.clone()
                },
                outcome,
            ),
            Classification::Nodes { summary, outcome } => (
                PollSnapshot {
                    last_checked_at: Some(checked_at),
                    upstream_http_status: Some(200),
                    rpc_error: None,
                    fetch_error: None,
                    nodes_online_summary: summary,
                    computed_base_status: outcome.base_status(),
                },
                outcome,
            ),
        },
    }
}
