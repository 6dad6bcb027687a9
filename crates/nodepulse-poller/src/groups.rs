//! Group resolver — best-effort uuid → group lookup.
//!
//! The lookup never fails the poll. Any problem (transport, non-200,
//! malformed result) yields [`GroupLookup::Degraded`], which behaves as an
//! empty map.

use nodepulse_state::NodeGroupMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::rpc::{RpcClient, GET_NODES};

const GET_NODES_ID: u64 = 1;

/// Result of one group lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLookup {
    Resolved(NodeGroupMap),
    /// The lookup failed; classification proceeds without groups.
    Degraded { reason: String },
}

impl GroupLookup {
    /// The mapping to classify with. Empty when degraded.
    pub fn into_map(self) -> NodeGroupMap {
        match self {
            GroupLookup::Resolved(map) => map,
            GroupLookup::Degraded { .. } => NodeGroupMap::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GroupLookup::Degraded { .. })
    }
}

/// Call `common:getNodes` and build the uuid → group mapping.
pub async fn resolve_groups(client: &RpcClient) -> GroupLookup {
    let lookup = match client.call(GET_NODES_ID, GET_NODES).await {
        Ok(reply) if reply.status != 200 => GroupLookup::Degraded {
            reason: format!("upstream returned HTTP {}", reply.status),
        },
        Ok(reply) => match reply.body.as_ref().and_then(groups_from_body) {
            Some(map) => GroupLookup::Resolved(map),
            None => GroupLookup::Degraded {
                reason: "missing or malformed result".to_string(),
            },
        },
        Err(e) => GroupLookup::Degraded {
            reason: e.to_string(),
        },
    };

    match &lookup {
        GroupLookup::Resolved(map) => debug!(grouped = map.len(), "node groups resolved"),
        GroupLookup::Degraded { reason } => {
            warn!(%reason, "node group lookup failed, continuing without groups")
        }
    }
    lookup
}

/// Extract the mapping from a `common:getNodes` body.
///
/// Returns `None` when `result` is missing or not an object. Entries
/// without a non-empty string `group` are left out.
pub fn groups_from_body(body: &Value) -> Option<NodeGroupMap> {
    let result = body.get("result")?.as_object()?;
    let map = result
        .iter()
        .filter_map(|(uuid, node)| {
            let group = node.get("group")?.as_str()?;
            (!group.is_empty()).then(|| (uuid.clone(), group.to_string()))
        })
        .collect();
    Some(map)
}
