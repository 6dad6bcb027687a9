//! nodepulse-poller — the poll → fetch → classify → publish pipeline.
//!
//! Polls an upstream JSON-RPC endpoint for node status, folds every
//! possible upstream outcome into one base status code, and publishes
//! the result to the [`nodepulse_state::SnapshotStore`].
//!
//! # Architecture
//!
//! ```text
//! PollScheduler (interval, first tick immediate, missed ticks skipped)
//!   └── Poller::try_poll() — size-1 semaphore, overlapping ticks skipped
//!         ├── resolve_groups()  → GroupLookup (degrades to empty map)
//!         ├── fetch_status()    → FetchOutcome (HTTP status mapped first)
//!         ├── classify()        → Classification (summary + Outcome)
//!         └── SnapshotStore::replace()
//! ```
//!
//! # Status codes
//!
//! | Upstream | Base status |
//! |---|---|
//! | timeout / network error | 503 |
//! | HTTP 5xx | 503 |
//! | HTTP 404 / 400 | 404 / 400 |
//! | HTTP 401 / 403 | 401 |
//! | other non-200 | 503 |
//! | JSON-RPC `error`, missing `result` | 502 |
//! | empty result, all ignored, some offline | 503 |
//! | every considered node online | 200 |

pub mod classifier;
pub mod config;
pub mod fetcher;
pub mod groups;
pub mod outcome;
pub mod poller;
pub mod rpc;
pub mod scheduler;

pub use classifier::{Classification, classify};
pub use config::PollerConfig;
pub use fetcher::FetchOutcome;
pub use groups::GroupLookup;
pub use outcome::Outcome;
pub use poller::Poller;
pub use rpc::{RpcClient, RpcError};
pub use scheduler::PollScheduler;
