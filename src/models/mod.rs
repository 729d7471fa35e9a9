//! Data models for the Vigente API

use serde::{Deserialize, Serialize};

use crate::attestation::Attestation;
use crate::oracle::{OracleMetadata, Transaction, UserProfile};
use crate::services::{BadgeType, CreditScoreResult, HistoryStats, ScoreBreakdown};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// ===== Requests =====

/// Query for GET /api/score
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreQuery {
    pub rut: String,
    /// Overrides the configured scoring window
    #[serde(alias = "period_months")]
    pub period_months: Option<u32>,
}

/// Body for POST /api/attestation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRequestBody {
    /// Stellar account or contract the attestation is bound to
    pub address: String,
    pub rut: String,
    #[serde(alias = "period_months")]
    pub period_months: Option<u32>,
}

// ===== Responses =====

/// Score as shown to the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringView {
    pub score: u32,
    pub tier: u32,
    /// A, B, C or D
    pub tier_label: String,
    pub badge_type: BadgeType,
    pub max_loan_amount: u32,
    pub breakdown: ScoreBreakdown,
    /// EXCELLENT, GOOD, FAIR or INSUFFICIENT
    pub capability: String,
    pub period_months: u32,
}

impl ScoringView {
    pub fn new(result: &CreditScoreResult, period_months: u32) -> Self {
        let tier = result.credit_tier();
        Self {
            score: result.total_score,
            tier: result.tier,
            tier_label: tier.label().to_string(),
            badge_type: result.badge_type,
            max_loan_amount: result.max_loan_amount,
            breakdown: result.breakdown,
            capability: tier.capability().to_string(),
            period_months,
        }
    }
}

/// Whole-history figures for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub monthly_volume: f64,
    /// One decimal
    pub history_months: f64,
    pub total_transactions: u32,
    pub avg_transaction_size: f64,
    pub consistency_score: f64,
}

impl From<&HistoryStats> for StatsView {
    fn from(stats: &HistoryStats) -> Self {
        Self {
            monthly_volume: stats.avg_per_month,
            history_months: stats.history_months(),
            total_transactions: stats.transaction_count,
            avg_transaction_size: stats.avg_transaction_size,
            consistency_score: stats.consistency_score,
        }
    }
}

/// Response for GET /api/score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub profile: UserProfile,
    pub scoring: ScoringView,
    pub stats: StatsView,
    pub history: Vec<Transaction>,
    pub metadata: OracleMetadata,
}

/// Response for POST /api/attestation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    pub scoring: ScoringView,
    /// `None` when signing is unavailable; the score is still valid
    pub attestation: Option<Attestation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attestation_error: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Public key of the oracle signing key, if one is loaded
    pub signer: Option<String>,
}
