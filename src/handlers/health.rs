//! Liveness handlers

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::state::AttestationSetup;

pub async fn root() -> &'static str {
    "Vigente Credit Oracle API"
}

/// Health check endpoint
pub async fn health_check(State(attestation): State<AttestationSetup>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        signer: attestation.signer_public_key(),
    })
}
