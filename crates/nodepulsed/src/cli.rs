//! Command-line and environment configuration.
//!
//! Every flag can also be set through the environment variable named in
//! its `env` attribute; flags win over the environment.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use nodepulse_poller::PollerConfig;
use nodepulse_state::IgnoreSet;

#[derive(Parser, Debug)]
#[command(
    name = "nodepulsed",
    about = "Aggregate upstream node health into a single HTTP status",
    version
)]
pub struct Cli {
    /// Upstream base URL; RPC calls go to `{base}/api/rpc2`.
    #[arg(long, env = "BASE_URL", value_parser = parse_base_url)]
    pub base_url: String,

    /// Milliseconds between poll cycles.
    #[arg(
        long,
        env = "POLL_INTERVAL_MS",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(100..)
    )]
    pub poll_interval_ms: u64,

    /// Bearer token for the upstream RPC endpoint.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Raw `Cookie` header for the upstream RPC endpoint.
    #[arg(long, env = "COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Comma-separated group labels to leave out of the aggregate.
    #[arg(long, env = "IGNORE_GROUPS", value_delimiter = ',')]
    pub ignore_groups: Vec<String>,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// The fixed configuration handed to the poller.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::new(self.base_url.clone())
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_api_key(self.api_key.clone())
            .with_cookie(self.cookie.clone())
            .with_ignore_groups(IgnoreSet::new(&self.ignore_groups))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Accept only absolute http(s) URLs.
fn parse_base_url(s: &str) -> Result<String, String> {
    let url = reqwest::Url::parse(s.trim()).map_err(|e| format!("invalid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(s.trim().to_string()),
        other => Err(format!("unsupported scheme {other:?}, expected http or https")),
    }
}
