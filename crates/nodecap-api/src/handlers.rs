//! REST API handlers.
//!
//! Each handler runs a fresh accounting cycle and returns JSON responses.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use nodecap_accounting::AccountingError;

use crate::ApiState;
use crate::view::{NodeView, node_views};

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn cycle_failed(e: &AccountingError) -> axum::response::Response {
    warn!(error = %e, "accounting cycle failed");
    error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

// ── Nodes ──────────────────────────────────────────────────────

/// GET /api/v1/nodes
pub async fn list_nodes(State(state): State<ApiState>) -> impl IntoResponse {
    match state.accountant.report().await {
        Ok(reports) => ApiResponse::ok(node_views(reports)).into_response(),
        Err(e) => cycle_failed(&e),
    }
}

/// GET /api/v1/nodes/{name}
pub async fn get_node(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.accountant.report().await {
        Ok(mut reports) => match reports.remove(&name) {
            Some(report) => ApiResponse::ok(NodeView::from(report)).into_response(),
            None => error_response("node not found", StatusCode::NOT_FOUND).into_response(),
        },
        Err(e) => cycle_failed(&e),
    }
}

// ── Requests ───────────────────────────────────────────────────

/// GET /api/v1/requests
pub async fn list_requests(State(state): State<ApiState>) -> impl IntoResponse {
    match state.accountant.request_totals().await {
        Ok(totals) => ApiResponse::ok(totals).into_response(),
        Err(e) => cycle_failed(&e),
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    ApiResponse::ok(serde_json::json!({ "status": "ok" }))
}
