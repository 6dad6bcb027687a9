//! nodepulse-api — HTTP façade over the snapshot store.
//!
//! Uptime monitors hit `/` and read the HTTP status; humans use the
//! JSON bodies. Handlers only read the store.
//!
//! # Routes
//!
//! | Method | Path | Status | Body |
//! |---|---|---|---|
//! | GET | `/`, `/status` | computed base status | `{status, lastCheckedAt, onlineCount, totalNodes, offlineUuids}` |
//! | GET | `/health` | 200 | `{ok, lastCheckedAt, pollIntervalMs}` |
//! | GET | `/debug` | 200 | full snapshot |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use nodepulse_state::SnapshotStore;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: SnapshotStore,
    /// Reported by `/health`.
    pub poll_interval_ms: u64,
}

/// Build the complete router.
pub fn build_router(store: SnapshotStore, poll_interval_ms: u64) -> Router {
    let state = ApiState {
        store,
        poll_interval_ms,
    };

    Router::new()
        .route("/", get(handlers::status))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/debug", get(handlers::debug_snapshot))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use nodepulse_state::{NodesSummary, PollSnapshot};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn some_offline() -> PollSnapshot {
        PollSnapshot {
            upstream_http_status: Some(200),
            nodes_online_summary: NodesSummary {
                total_nodes: 2,
                online_count: 1,
                offline_count: 1,
                offline_uuids: vec!["u2".to_string()],
                ..NodesSummary::zeroed()
            },
            computed_base_status: 503,
            ..PollSnapshot::pre_poll()
        }
    }

    #[tokio::test]
    async fn root_and_status_agree() {
        let store = SnapshotStore::with_snapshot(some_offline());
        let router = build_router(store, 5000);

        let (root_status, root_body) = get_json(router.clone(), "/").await;
        let (status, body) = get_json(router, "/status").await;

        assert_eq!(root_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status, root_status);
        assert_eq!(body, root_body);
        assert_eq!(body["status"], "some_offline");
        assert_eq!(body["offlineUuids"], json!(["u2"]));
    }

    #[tokio::test]
    async fn health_reports_poll_interval() {
        let router = build_router(SnapshotStore::new(), 2500);
        let (status, body) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"ok": true, "lastCheckedAt": null, "pollIntervalMs": 2500})
        );
    }

    #[tokio::test]
    async fn debug_returns_snapshot_verbatim() {
        let snap = some_offline();
        let router = build_router(SnapshotStore::with_snapshot(snap.clone()), 5000);
        let (status, body) = get_json(router, "/debug").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(&snap).unwrap());
    }

    #[tokio::test]
    async fn router_sees_store_updates() {
        let store = SnapshotStore::new();
        let router = build_router(store.clone(), 5000);

        let (status, body) = get_json(router.clone(), "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "error");

        store
            .replace(PollSnapshot {
                computed_base_status: 200,
                ..some_offline()
            })
            .await;
        let (status, body) = get_json(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "all_online");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let router = build_router(SnapshotStore::new(), 5000);
        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
