//! Poller configuration.
//!
//! The daemon builds a [`PollerConfig`] once at start-up from flags and
//! environment variables; the poller treats it as fixed.

use std::fmt;
use std::time::Duration;

use nodepulse_state::IgnoreSet;

/// Default interval between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Per-call bound on each upstream RPC request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Shortest interval the scheduler will tick at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Path of the JSON-RPC endpoint under the base URL.
pub const RPC_PATH: &str = "/api/rpc2";

/// Everything the poll pipeline needs to reach upstream.
#[derive(Clone)]
pub struct PollerConfig {
    /// Upstream base URL, e.g. `https://status.example.com`.
    pub base_url: String,
    pub poll_interval: Duration,
    pub rpc_timeout: Duration,
    /// Sent as `Authorization: Bearer <key>` when set.
    pub api_key: Option<String>,
    /// Sent verbatim as the `Cookie` header when set.
    pub cookie: Option<String>,
    pub ignore_groups: IgnoreSet,
}

impl PollerConfig {
    /// Config with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            api_key: None,
            cookie: None,
            ignore_groups: IgnoreSet::default(),
        }
    }

    /// Full URL of the JSON-RPC endpoint.
    pub fn rpc_endpoint(&self) -> String {
        format!("{}{RPC_PATH}", self.base_url.trim_end_matches('/'))
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = non_blank(api_key);
        self
    }

    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = non_blank(cookie);
        self
    }

    pub fn with_ignore_groups(mut self, ignore_groups: IgnoreSet) -> Self {
        self.ignore_groups = ignore_groups;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }
}

impl fmt::Debug for PollerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollerConfig")
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .field("rpc_timeout", &self.rpc_timeout)
            .field("api_key", &redacted(&self.api_key))
            .field("cookie", &redacted(&self.cookie))
            .field("ignore_groups", &self.ignore_groups)
            .finish()
    }
}

/// Debug stand-in for a credential: shows whether it is set, never its value.
pub(crate) fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
