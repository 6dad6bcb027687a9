//! SnapshotStore — the single published poll result.
//!
//! The store holds an `Arc<PollSnapshot>` behind a lock. Writers swap the
//! whole `Arc`; readers clone it out and release the lock immediately, so
//! a reader always sees one complete snapshot and never waits on a poll
//! cycle.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use crate::types::PollSnapshot;

/// Shared handle to the latest poll snapshot.
///
/// Initialised to [`PollSnapshot::pre_poll`], replaced only by the poll
/// pipeline and dropped at process exit.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<PollSnapshot>>>,
}

impl SnapshotStore {
    /// Create a store holding the pre-poll default.
    pub fn new() -> Self {
        Self::with_snapshot(PollSnapshot::pre_poll())
    }

    /// Create a store seeded with a specific snapshot (for testing).
    pub fn with_snapshot(snapshot: PollSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The current snapshot. The returned `Arc` stays valid and unchanged
    /// even if a replacement lands right after.
    pub async fn read(&self) -> Arc<PollSnapshot> {
        self.current.read().await.clone()
    }

    /// Atomically publish a new snapshot, returning the one it replaced.
    pub async fn replace(&self, snapshot: PollSnapshot) -> Arc<PollSnapshot> {
        let next = Arc::new(snapshot);
        let mut current = self.current.write().await;
        trace!(status = next.computed_base_status, "snapshot replaced");
        std::mem::replace(&mut *current, next)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
