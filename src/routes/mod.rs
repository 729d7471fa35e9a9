//! Route definitions for Vigente API

mod attestation;
mod score;

use axum::{routing::get, Router};

use crate::handlers::{health_check, root};
use crate::middleware;
use crate::state::AppState;

pub use attestation::attestation_routes;
pub use score::score_routes;

/// Full application router with per-request middleware. CORS is left to the caller.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(score_routes())
        .merge(attestation_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
