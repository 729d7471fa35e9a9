//! Attestation API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::score::score_customer;
use crate::attestation::{AttestationRequest, ScAddressCodec};
use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, AttestationRequestBody, AttestationResponse, ScoringView};
use crate::state::AppState;

/// POST /api/attestation - Score a customer and sign the result for on-chain use
///
/// Signing problems never hide the score: the response then carries
/// `attestation: null` and the reason in `attestationError`.
pub async fn create_attestation(
    State(state): State<AppState>,
    payload: Result<Json<AttestationRequestBody>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AttestationResponse>>> {
    let Json(body) = payload?;
    let address = body.address.trim();
    if address.is_empty() {
        return Err(ApiError::ValidationError("address is required".to_string()));
    }
    // Reject bad addresses before the oracle round trip
    ScAddressCodec::sc_address(address)?;

    let scored = score_customer(&state, &body.rut, body.period_months).await?;
    let scoring = ScoringView::new(&scored.result, scored.period_months);

    let (attestation, attestation_error) = match state.attestation.service() {
        Ok(service) => {
            let request = AttestationRequest {
                address,
                tier: scored.result.tier,
                score: scored.result.total_score,
                identifier: &body.rut,
            };

            match service.attest(&request) {
                Ok(attestation) => (Some(attestation), None),
                Err(e) if e.is_key_material() => {
                    tracing::warn!(error = %e, "Attestation signing failed, returning score only");
                    (None, Some(e.to_string()))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(reason) => (None, Some(reason.to_string())),
    };

    Ok(Json(ApiResponse::ok(AttestationResponse {
        scoring,
        attestation,
        attestation_error,
    })))
}
