//! Poll outcome tags.
//!
//! An [`Outcome`] names which branch of the pipeline a cycle ended in.
//! It feeds log fields only; the status string served to clients is
//! derived from the snapshot instead (see `nodepulse_state::StatusLabel`).

use std::fmt;

/// Terminal branch of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every considered node is online.
    AllOnline,
    /// At least one considered node is offline.
    SomeOffline,
    /// Upstream returned an empty result.
    NoNodes,
    /// Every node belongs to an ignored group.
    AllNodesIgnored,
    /// Body carried a JSON-RPC `error`.
    RpcError,
    /// Body had no usable `result` object.
    InvalidResult,
    /// Upstream answered 5xx.
    UpstreamServerError,
    NotFound,
    BadRequest,
    /// Upstream answered 401 or 403.
    Unauthorized,
    /// Any other non-200 status.
    UnexpectedStatus,
    /// Timeout, network error, or unreadable 200 body.
    FetchFailed,
}

impl Outcome {
    /// The base status code this outcome publishes.
    pub fn base_status(self) -> u16 {
        match self {
            Outcome::AllOnline => 200,
            Outcome::SomeOffline
            | Outcome::NoNodes
            | Outcome::AllNodesIgnored
            | Outcome::UpstreamServerError
            | Outcome::UnexpectedStatus
            | Outcome::FetchFailed => 503,
            Outcome::RpcError | Outcome::InvalidResult => 502,
            Outcome::NotFound => 404,
            Outcome::BadRequest => 400,
            Outcome::Unauthorized => 401,
        }
    }

    /// Stable tag used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::AllOnline => "all_online",
            Outcome::SomeOffline => "some_offline",
            Outcome::NoNodes => "no_nodes",
            Outcome::AllNodesIgnored => "all_nodes_ignored",
            Outcome::RpcError => "rpc_error",
            Outcome::InvalidResult => "invalid_result",
            Outcome::UpstreamServerError => "upstream_5xx",
            Outcome::NotFound => "upstream_404",
            Outcome::BadRequest => "upstream_400",
            Outcome::Unauthorized => "upstream_unauthorized",
            Outcome::UnexpectedStatus => "unexpected_status",
            Outcome::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_status_mapping() {
        assert_eq!(Outcome::AllOnline.base_status(), 200);
        assert_eq!(Outcome::SomeOffline.base_status(), 503);
        assert_eq!(Outcome::NoNodes.base_status(), 503);
        assert_eq!(Outcome::AllNodesIgnored.base_status(), 503);
        assert_eq!(Outcome::RpcError.base_status(), 502);
        assert_eq!(Outcome::InvalidResult.base_status(), 502);
        assert_eq!(Outcome::UpstreamServerError.base_status(), 503);
        assert_eq!(Outcome::NotFound.base_status(), 404);
        assert_eq!(Outcome::BadRequest.base_status(), 400);
        assert_eq!(Outcome::Unauthorized.base_status(), 401);
        assert_eq!(Outcome::UnexpectedStatus.base_status(), 503);
        assert_eq!(Outcome::FetchFailed.base_status(), 503);
    }

    #[test]
    fn display_uses_tag() {
        assert_eq!(Outcome::AllNodesIgnored.to_string(), "all_nodes_ignored");
        assert_eq!(Outcome::Unauthorized.to_string(), "upstream_unauthorized");
    }
}
