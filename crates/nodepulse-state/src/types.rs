//! Domain types for the nodepulse snapshot store.
//!
//! These types describe one poll result: the per-node summary, the
//! upstream error slots, and the base status code the HTTP façade
//! returns. All of them serialize to the camelCase JSON shape served
//! by the debug endpoint.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a monitored node.
pub type NodeUuid = String;

/// Node UUID → group label, rebuilt on every poll.
pub type NodeGroupMap = HashMap<NodeUuid, String>;

/// Base status published before the first poll completes.
pub const PRE_POLL_STATUS: u16 = 503;

// ── Ignore set ─────────────────────────────────────────────────────

/// Immutable set of group labels whose nodes are left out of aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    groups: HashSet<String>,
}

impl IgnoreSet {
    /// Build an ignore set from raw labels. Labels are trimmed and blank
    /// entries dropped.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { groups }
    }

    /// Whether nodes in `group` should be ignored.
    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Labels in sorted order, for logging.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.groups.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

// ── Summary ────────────────────────────────────────────────────────

/// Per-node tally produced by the classifier.
///
/// `ignored_count` / `ignored_uuids` are absent only when the upstream
/// result was an empty object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodesSummary {
    pub total_nodes: u32,
    pub online_count: u32,
    pub offline_count: u32,
    pub offline_uuids: Vec<NodeUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_uuids: Option<Vec<NodeUuid>>,
}

impl NodesSummary {
    /// All-zero summary with the ignore fields present.
    pub fn zeroed() -> Self {
        Self {
            total_nodes: 0,
            online_count: 0,
            offline_count: 0,
            offline_uuids: Vec::new(),
            ignored_count: Some(0),
            ignored_uuids: Some(Vec::new()),
        }
    }

    /// Summary written when upstream reports no nodes at all. The ignore
    /// fields are omitted here and nowhere else.
    pub fn empty_result() -> Self {
        Self {
            total_nodes: 0,
            online_count: 0,
            offline_count: 0,
            offline_uuids: Vec::new(),
            ignored_count: None,
            ignored_uuids: None,
        }
    }
}

impl Default for NodesSummary {
    fn default() -> Self {
        Self::zeroed()
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Result of the most recent completed poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    pub last_checked_at: Option<DateTime<Utc>>,
    pub upstream_http_status: Option<u16>,
    /// JSON-RPC error object, verbatim or synthetic.
    pub rpc_error: Option<serde_json::Value>,
    /// Transport failure description.
    pub fetch_error: Option<String>,
    pub nodes_online_summary: NodesSummary,
    pub computed_base_status: u16,
}

impl PollSnapshot {
    /// The snapshot served before any poll has completed.
    pub fn pre_poll() -> Self {
        Self {
            last_checked_at: None,
            upstream_http_status: None,
            rpc_error: None,
            fetch_error: None,
            nodes_online_summary: NodesSummary::zeroed(),
            computed_base_status: PRE_POLL_STATUS,
        }
    }

    /// Externally visible status label for this snapshot.
    pub fn status_label(&self) -> StatusLabel {
        if self.computed_base_status == 200 {
            StatusLabel::AllOnline
        } else if self.fetch_error.is_some() {
            StatusLabel::UpstreamError
        } else if self.rpc_error.is_some() {
            StatusLabel::RpcError
        } else if self.nodes_online_summary.offline_count > 0 {
            StatusLabel::SomeOffline
        } else {
            StatusLabel::Error
        }
    }
}

impl Default for PollSnapshot {
    fn default() -> Self {
        Self::pre_poll()
    }
}

/// Status string returned by the primary status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    AllOnline,
    UpstreamError,
    RpcError,
    SomeOffline,
    Error,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::AllOnline => "all_online",
            StatusLabel::UpstreamError => "upstream_error",
            StatusLabel::RpcError => "rpc_error",
            StatusLabel::SomeOffline => "some_offline",
            StatusLabel::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
