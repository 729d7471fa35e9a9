//! Attestation route definitions

use axum::{routing::post, Router};

use crate::handlers::attestation::create_attestation;
use crate::state::AppState;

pub fn attestation_routes() -> Router<AppState> {
    Router::new().route("/api/attestation", post(create_attestation))
}
