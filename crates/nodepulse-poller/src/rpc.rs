//! Upstream JSON-RPC client.
//!
//! Every call is a single `POST {base}/api/rpc2` carrying a JSON-RPC 2.0
//! envelope, bounded by its own timeout. Only HTTP 200 bodies are read
//! and parsed; for any other status the caller gets the code alone.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{PollerConfig, redacted};

/// Method returning node metadata, including the group label.
pub const GET_NODES: &str = "common:getNodes";

/// Method returning the latest online state of every node.
pub const GET_NODES_LATEST_STATUS: &str = "common:getNodesLatestStatus";

/// Errors raised by a single RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid JSON body: {0}")]
    Decode(String),
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// What came back from one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcReply {
    /// HTTP status of the response.
    pub status: u16,
    /// Parsed body, present only when `status == 200`.
    pub body: Option<serde_json::Value>,
}

/// HTTP client bound to one upstream endpoint and its credentials.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cookie: Option<String>,
    timeout: Duration,
}

impl RpcClient {
    /// Build a client for the endpoint described by `config`.
    ///
    /// Idle connections are not pooled, so nothing outlives a poll cycle.
    pub fn new(config: &PollerConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nodepulse/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.rpc_endpoint(),
            api_key: config.api_key.clone(),
            cookie: config.cookie.clone(),
            timeout: config.rpc_timeout,
        })
    }

    /// Invoke `method` with empty params.
    pub async fn call(&self, id: u64, method: &str) -> Result<RpcReply, RpcError> {
        let request = RpcRequest::new(id, method);

        match tokio::time::timeout(self.timeout, self.send(&request)).await {
            Ok(reply) => reply,
            Err(_) => {
                debug!(%method, timeout_ms = self.timeout.as_millis() as u64, "rpc call timed out");
                Err(RpcError::Timeout(self.timeout))
            }
        }
    }

    async fn send(&self, request: &RpcRequest<'_>) -> Result<RpcReply, RpcError> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();

        if status != 200 {
            debug!(method = request.method, status, "rpc call returned non-200");
            return Ok(RpcReply { status, body: None });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let body = serde_json::from_slice(&bytes).map_err(|e| RpcError::Decode(e.to_string()))?;

        Ok(RpcReply {
            status,
            body: Some(body),
        })
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redacted(&self.api_key))
            .field("cookie", &redacted(&self.cookie))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
