//! HTTP handlers.
//!
//! Each handler takes one `read()` of the snapshot store and serializes
//! it. Nothing here waits on a poll cycle.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use nodepulse_state::{NodeUuid, PollSnapshot, StatusLabel};

use crate::ApiState;

const NO_STORE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store")];

/// Body of the primary status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: StatusLabel,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub online_count: u32,
    pub total_nodes: u32,
    pub offline_uuids: Vec<NodeUuid>,
}

impl From<&PollSnapshot> for StatusResponse {
    fn from(snap: &PollSnapshot) -> Self {
        let summary = &snap.nodes_online_summary;
        Self {
            status: snap.status_label(),
            last_checked_at: snap.last_checked_at,
            online_count: summary.online_count,
            total_nodes: summary.total_nodes,
            offline_uuids: summary.offline_uuids.clone(),
        }
    }
}

/// Body of the liveness endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub poll_interval_ms: u64,
}

/// Map a stored base status to an HTTP status. Out-of-range codes fall
/// back to 503.
fn http_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// GET / and GET /status
pub async fn status(State(state): State<ApiState>) -> impl IntoResponse {
    let snap = state.store.read().await;
    (
        http_status(snap.computed_base_status),
        NO_STORE,
        Json(StatusResponse::from(snap.as_ref())),
    )
}

/// GET /health
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let snap = state.store.read().await;
    (
        StatusCode::OK,
        NO_STORE,
        Json(HealthResponse {
            ok: true,
            last_checked_at: snap.last_checked_at,
            poll_interval_ms: state.poll_interval_ms,
        }),
    )
}

/// GET /debug
pub async fn debug_snapshot(State(state): State<ApiState>) -> impl IntoResponse {
    let snap = state.store.read().await;
    (StatusCode::OK, NO_STORE, Json(snap.as_ref().clone()))
}
