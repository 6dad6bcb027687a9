//! Classifier — turns a 200 status body into a summary and base status.
//!
//! Steps, in order:
//! 1. a JSON-RPC `error` field → 502
//! 2. `result` missing or not an object → synthetic error, 502
//! 3. empty `result` → zeroed summary, 503
//! 4. partition nodes into ignored / online / offline (result order)
//! 5. 200 only when every considered node is online and there is at
//!    least one considered node; 503 otherwise

use nodepulse_state::{IgnoreSet, NodeGroupMap, NodesSummary};
use serde_json::{Value, json};

use crate::outcome::Outcome;

/// Message of the error synthesized for a missing or non-object `result`.
pub const INVALID_RESULT_MESSAGE: &str = "Invalid or missing result";

/// What the classifier concluded from one body.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Upstream reported an error, or the result was unusable.
    RpcError { error: Value, outcome: Outcome },
    /// Nodes were counted.
    Nodes {
        summary: NodesSummary,
        outcome: Outcome,
    },
}

impl Classification {
    pub fn outcome(&self) -> Outcome {
        match self {
            Classification::RpcError { outcome, .. } | Classification::Nodes { outcome, .. } => {
                *outcome
            }
        }
    }

    pub fn base_status(&self) -> u16 {
        self.outcome().base_status()
    }
}

/// Classify a parsed `common:getNodesLatestStatus` body.
pub fn classify(body: &Value, groups: &NodeGroupMap, ignore: &IgnoreSet) -> Classification {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Classification::RpcError {
            error: error.clone(),
            outcome: Outcome::RpcError,
        };
    }

    let Some(result) = body.get("result").and_then(Value::as_object) else {
        return Classification::RpcError {
            error: json!({ "message": INVALID_RESULT_MESSAGE }),
            outcome: Outcome::InvalidResult,
        };
    };

    if result.is_empty() {
        return Classification::Nodes {
            summary: NodesSummary::empty_result(),
            outcome: Outcome::NoNodes,
        };
    }

    let total = result.len() as u32;
    let mut online = 0u32;
    let mut offline_uuids = Vec::new();
    let mut ignored_uuids = Vec::new();

    for (uuid, node) in result {
        let ignored = groups
            .get(uuid)
            .is_some_and(|group| ignore.contains(group));
        if ignored {
            ignored_uuids.push(uuid.clone());
            continue;
        }

        // Only a literal `true` counts; absent or non-boolean is offline.
        if node.get("online") == Some(&Value::Bool(true)) {
            online += 1;
        } else {
            offline_uuids.push(uuid.clone());
        }
    }

    let ignored = ignored_uuids.len() as u32;
    let considered = total - ignored;
    let offline = considered - online;

    let outcome = if considered == 0 {
        Outcome::AllNodesIgnored
    } else if online == considered {
        Outcome::AllOnline
    } else {
        Outcome::SomeOffline
    };

    Classification::Nodes {
        summary: NodesSummary {
            total_nodes: total,
            online_count: online,
            offline_count: offline,
            offline_uuids,
            ignored_count: Some(ignored),
            ignored_uuids: Some(ignored_uuids),
        },
        outcome,
    }
}
