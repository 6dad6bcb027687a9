//! Status fetcher — the authoritative `common:getNodesLatestStatus` call.
//!
//! HTTP-level outcomes are decided here, strictly before anything looks
//! inside the body: a 500 carrying a valid JSON-RPC error is still a 503.

use serde_json::Value;
use tracing::debug;

use crate::outcome::Outcome;
use crate::rpc::{RpcClient, GET_NODES_LATEST_STATUS};

const GET_STATUS_ID: u64 = 2;

/// What the status call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Timeout, network failure, or an unreadable 200 body.
    TransportFailed(String),
    /// Non-200 response, already mapped to its outcome.
    HttpError { http_status: u16, outcome: Outcome },
    /// HTTP 200 with a parsed JSON body for the classifier.
    Body(Value),
}

/// Map a non-200 upstream status to its outcome. `None` for 200.
///
/// Order matters: 5xx, then 404, 400, 401/403, then anything else.
pub fn classify_http_status(status: u16) -> Option<Outcome> {
    match status {
        s if s >= 500 => Some(Outcome::UpstreamServerError),
        404 => Some(Outcome::NotFound),
        400 => Some(Outcome::BadRequest),
        401 | 403 => Some(Outcome::Unauthorized),
        200 => None,
        _ => Some(Outcome::UnexpectedStatus),
    }
}

/// Perform the status call and sort the response into a [`FetchOutcome`].
pub async fn fetch_status(client: &RpcClient) -> FetchOutcome {
    let reply = match client.call(GET_STATUS_ID, GET_NODES_LATEST_STATUS).await {
        Ok(reply) => reply,
        Err(e) => {
            debug!(error = %e, "status fetch failed");
            return FetchOutcome::TransportFailed(e.to_string());
        }
    };

    if let Some(outcome) = classify_http_status(reply.status) {
        return FetchOutcome::HttpError {
            http_status: reply.status,
            outcome,
        };
    }

    match reply.body {
        Some(body) => FetchOutcome::Body(body),
        // The client always parses 200 bodies; keep the invariant explicit.
        None => FetchOutcome::TransportFailed("empty response body".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::PollerConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn http_status_precedence() {
        assert_eq!(classify_http_status(500), Some(Outcome::UpstreamServerError));
        assert_eq!(classify_http_status(503), Some(Outcome::UpstreamServerError));
        assert_eq!(classify_http_status(599), Some(Outcome::UpstreamServerError));
        assert_eq!(classify_http_status(404), Some(Outcome::NotFound));
        assert_eq!(classify_http_status(400), Some(Outcome::BadRequest));
        assert_eq!(classify_http_status(401), Some(Outcome::Unauthorized));
        assert_eq!(classify_http_status(403), Some(Outcome::Unauthorized));
        assert_eq!(classify_http_status(302), Some(Outcome::UnexpectedStatus));
        assert_eq!(classify_http_status(418), Some(Outcome::UnexpectedStatus));
        assert_eq!(classify_http_status(204), Some(Outcome::UnexpectedStatus));
        assert_eq!(classify_http_status(200), None);
    }

    async fn fetch_against(response: ResponseTemplate) -> FetchOutcome {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc2"))
            .and(body_partial_json(
                json!({"id": 2, "method": "common:getNodesLatestStatus"}),
            ))
            .respond_with(response)
            .mount(&server)
            .await;
        let client = RpcClient::new(&PollerConfig::new(server.uri())).unwrap();
        fetch_status(&client).await
    }

    #[tokio::test]
    async fn server_error_with_rpc_body_is_still_http_error() {
        let outcome = fetch_against(ResponseTemplate::new(500).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": {"code": -32000, "message": "db down"}
        })))
        .await;
        assert_eq!(
            outcome,
            FetchOutcome::HttpError {
                http_status: 500,
                outcome: Outcome::UpstreamServerError
            }
        );
    }

    #[tokio::test]
    async fn forbidden_maps_to_unauthorized() {
        let outcome = fetch_against(ResponseTemplate::new(403)).await;
        assert_eq!(
            outcome,
            FetchOutcome::HttpError {
                http_status: 403,
                outcome: Outcome::Unauthorized
            }
        );
    }

    #[tokio::test]
    async fn ok_body_is_handed_over() {
        let body = json!({"jsonrpc": "2.0", "id": 2, "result": {"u1": {"online": true}}});
        let outcome = fetch_against(ResponseTemplate::new(200).set_body_json(body.clone())).await;
        assert_eq!(outcome, FetchOutcome::Body(body));
    }

    #[tokio::test]
    async fn unparseable_ok_body_is_transport_failure() {
        let outcome =
            fetch_against(ResponseTemplate::new(200).set_body_string("<!doctype html>")).await;
        assert!(matches!(outcome, FetchOutcome::TransportFailed(msg) if msg.contains("invalid JSON")));
    }

    #[tokio::test]
    async fn timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        let config =
            PollerConfig::new(server.uri()).with_rpc_timeout(Duration::from_millis(100));
        let client = RpcClient::new(&config).unwrap();

        let outcome = fetch_status(&client).await;
        assert!(matches!(outcome, FetchOutcome::TransportFailed(msg) if msg.contains("timed out")));
    }
}
