//! nodecap-api: REST API for nodecap.
//!
//! Provides axum route handlers that run one accounting cycle per request
//! and return the result as JSON.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/nodes` | Capacity, allocatable, and free resources of every node |
//! | GET | `/api/v1/nodes/{name}` | The same for one node |
//! | GET | `/api/v1/requests` | Summed requests and limits per node |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;
pub mod view;

use axum::Router;
use axum::routing::get;
use nodecap_accounting::Accountant;

pub use view::{NodeView, ResourcesView, node_views};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub accountant: Accountant,
}

/// Build the complete API router.
pub fn build_router(accountant: Accountant) -> Router {
    let api_state = ApiState { accountant };

    let api_routes = Router::new()
        .route("/nodes", get(handlers::list_nodes))
        .route("/nodes/{name}", get(handlers::get_node))
        .route("/requests", get(handlers::list_requests))
        .with_state(api_state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
