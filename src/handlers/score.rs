//! Credit score API handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;

use crate::error::{ApiError, ApiResult};
use crate::identity::rut;
use crate::models::{ApiResponse, ScoreQuery, ScoreResponse, ScoringView, StatsView};
use crate::oracle::{user_id_for_rut, OracleResponse};
use crate::services::{aggregate, AnalysisWindow, CreditScoreResult, HistoryStats};
use crate::state::AppState;

/// Oracle data for one customer plus everything derived from it
pub(crate) struct ScoredCustomer {
    pub oracle: OracleResponse,
    pub result: CreditScoreResult,
    pub period_months: u32,
    pub stats: HistoryStats,
}

/// Validate the RUT, fetch the customer's history and score it.
///
/// The raw RUT is never logged; only the oracle's customer id is.
pub(crate) async fn score_customer(
    state: &AppState,
    raw_rut: &str,
    period_months: Option<u32>,
) -> ApiResult<ScoredCustomer> {
    rut::validate_with_error(raw_rut).map_err(ApiError::ValidationError)?;

    let engine = match period_months {
        Some(months) => state.scoring_engine.with_window(AnalysisWindow::new(months)?),
        None => state.scoring_engine,
    };

    let user_id = user_id_for_rut(raw_rut);
    let oracle = state
        .provider
        .fetch_oracle_data(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No remittance history for this RUT".to_string()))?;

    let now = Utc::now();
    let result = engine.score_at(&oracle.transactions, now);
    let stats = aggregate(&oracle.transactions, now);

    tracing::info!(
        user_id = %user_id,
        source = ?oracle.metadata.source,
        transactions = oracle.transactions.len(),
        score = result.total_score,
        tier = result.tier,
        "Scored customer"
    );

    Ok(ScoredCustomer {
        oracle,
        result,
        period_months: engine.window().period_months(),
        stats,
    })
}

/// GET /api/score - Score a customer by RUT
pub async fn get_score(
    State(state): State<AppState>,
    query: Result<Query<ScoreQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<ScoreResponse>>> {
    let Query(query) = query?;
    let scored = score_customer(&state, &query.rut, query.period_months).await?;

    let response = ScoreResponse {
        scoring: ScoringView::new(&scored.result, scored.period_months),
        stats: StatsView::from(&scored.stats),
        profile: scored.oracle.user,
        history: scored.oracle.transactions,
        metadata: scored.oracle.metadata,
    };

    Ok(Json(ApiResponse::ok(response)))
}
