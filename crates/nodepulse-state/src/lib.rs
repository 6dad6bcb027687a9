//! nodepulse-state — data model and snapshot store for nodepulse.
//!
//! Holds the one piece of shared state in the service: the latest
//! [`PollSnapshot`]. The poller replaces it once per cycle; the HTTP
//! façade only reads it.
//!
//! # Architecture
//!
//! ```text
//! SnapshotStore (Clone, Send + Sync)
//!   └── RwLock<Arc<PollSnapshot>>
//!         ├── replace() ← poll pipeline, one full swap per cycle
//!         └── read()    → HTTP handlers, Arc clone, no waiting on polls
//! ```

pub mod store;
pub mod types;

pub use store::SnapshotStore;
pub use types::*;
