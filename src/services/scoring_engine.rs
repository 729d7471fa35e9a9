//! Credit Scoring Engine for Vigente
//!
//! This module turns a remittance history into a credit score using a fixed
//! three-factor point scheme (volume, consistency, frequency) and maps the score
//! onto a tier ladder that also fixes the badge and the loan ceiling.
//!
//! Scoring is pure and never fails: an empty history is a defined outcome, and
//! malformed amounts contribute nothing rather than poisoning the score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oracle::Transaction;
use crate::services::stats::{window_stats, AnalysisWindow, StatusPolicy, WindowStats};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Maximum points awarded for monthly volume
pub const MAX_VOLUME_POINTS: u32 = 400;

/// Maximum points awarded for month-over-month consistency
pub const MAX_CONSISTENCY_POINTS: u32 = 300;

/// Maximum points awarded for transfer frequency
pub const MAX_FREQUENCY_POINTS: u32 = 300;

/// Maximum total score (scale 0-1000)
pub const MAX_CREDIT_SCORE: u32 = MAX_VOLUME_POINTS + MAX_CONSISTENCY_POINTS + MAX_FREQUENCY_POINTS;

/// Points every non-empty history gets for volume, however small
const VOLUME_FLOOR_POINTS: u32 = 50;

/// Span of the linear volume ramp ($100-$300 a month maps to 50-200 points)
const VOLUME_RAMP_START_USD: f64 = 100.0;
const VOLUME_RAMP_WIDTH_USD: f64 = 200.0;
const VOLUME_RAMP_POINTS: f64 = 150.0;

/// Share of the window with activity needed for full consistency points (4 of 6 months)
const CONSISTENCY_HIGH_RATE: f64 = 0.66;

/// Share of the window with activity needed for partial consistency points (3 of 6 months)
const CONSISTENCY_MID_RATE: f64 = 0.50;

// ============================================================================
// Data Models
// ============================================================================

/// Credit tier, ordered best (1) to worst (4)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub enum CreditTier {
    /// Tier A (800-1000)
    A,
    /// Tier B (500-799)
    B,
    /// Tier C (300-499)
    C,
    /// Does not qualify (0-299)
    Unqualified,
}

impl CreditTier {
    /// Single threshold ladder for tier, badge and loan ceiling. First match from the top wins.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 800 => CreditTier::A,
            s if s >= 500 => CreditTier::B,
            s if s >= 300 => CreditTier::C,
            _ => CreditTier::Unqualified,
        }
    }

    /// Numeric tier as stored on-chain (1 = best)
    pub fn number(&self) -> u32 {
        match self {
            CreditTier::A => 1,
            CreditTier::B => 2,
            CreditTier::C => 3,
            CreditTier::Unqualified => 4,
        }
    }

    pub fn badge(&self) -> BadgeType {
        match self {
            CreditTier::A => BadgeType::Gold,
            CreditTier::B => BadgeType::Silver,
            CreditTier::C => BadgeType::Bronze,
            CreditTier::Unqualified => BadgeType::None,
        }
    }

    /// Suggested loan ceiling in USDC
    pub fn max_loan_amount(&self) -> u32 {
        match self {
            CreditTier::A => 500,
            CreditTier::B => 300,
            CreditTier::C => 100,
            CreditTier::Unqualified => 0,
        }
    }

    /// Letter grade shown to customers
    pub fn label(&self) -> &'static str {
        match self {
            CreditTier::A => "A",
            CreditTier::B => "B",
            CreditTier::C => "C",
            CreditTier::Unqualified => "D",
        }
    }

    pub fn capability(&self) -> &'static str {
        match self {
            CreditTier::A => "EXCELLENT",
            CreditTier::B => "GOOD",
            CreditTier::C => "FAIR",
            CreditTier::Unqualified => "INSUFFICIENT",
        }
    }
}

impl TryFrom<u32> for CreditTier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CreditTier::A),
            2 => Ok(CreditTier::B),
            3 => Ok(CreditTier::C),
            4 => Ok(CreditTier::Unqualified),
            other => Err(format!("Invalid credit tier: {}", other)),
        }
    }
}

impl From<CreditTier> for u32 {
    fn from(tier: CreditTier) -> Self {
        tier.number()
    }
}

/// Badge minted for a tier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BadgeType {
    Gold,
    Silver,
    Bronze,
    None,
}

/// Points per factor
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// 0-400
    pub volume_points: u32,
    /// 0-300
    pub consistency_points: u32,
    /// 0-300
    pub frequency_points: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.volume_points + self.consistency_points + self.frequency_points
    }
}

/// Result of one scoring call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreResult {
    /// 0-1000, always the sum of the breakdown
    pub total_score: u32,
    /// 1-4
    pub tier: u32,
    pub badge_type: BadgeType,
    pub max_loan_amount: u32,
    pub breakdown: ScoreBreakdown,
}

impl CreditScoreResult {
    /// Result for a customer with no history at all
    pub fn empty() -> Self {
        Self::from_breakdown(ScoreBreakdown::default())
    }

    /// Derive score, tier, badge and ceiling from the factor points
    pub fn from_breakdown(breakdown: ScoreBreakdown) -> Self {
        let total_score = breakdown.total();
        let tier = CreditTier::from_score(total_score);

        Self {
            total_score,
            tier: tier.number(),
            badge_type: tier.badge(),
            max_loan_amount: tier.max_loan_amount(),
            breakdown,
        }
    }

    pub fn credit_tier(&self) -> CreditTier {
        CreditTier::from_score(self.total_score)
    }
}

// ============================================================================
// Scoring Engine
// ============================================================================

/// Deterministic remittance-based credit scoring
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    window: AnalysisWindow,
    status_policy: StatusPolicy,
}

impl ScoringEngine {
    /// Create a scoring engine with the given look-back window and status policy
    pub fn new(window: AnalysisWindow, status_policy: StatusPolicy) -> Self {
        Self {
            window,
            status_policy,
        }
    }

    pub fn window(&self) -> AnalysisWindow {
        self.window
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Same engine with a different look-back window
    pub fn with_window(self, window: AnalysisWindow) -> Self {
        Self { window, ..self }
    }

    /// Score a history as of now
    pub fn score(&self, transactions: &[Transaction]) -> CreditScoreResult {
        self.score_at(transactions, Utc::now())
    }

    /// Score a history as of `now`
    pub fn score_at(&self, transactions: &[Transaction], now: DateTime<Utc>) -> CreditScoreResult {
        if transactions.is_empty() {
            return CreditScoreResult::empty();
        }

        let stats = window_stats(transactions, self.window, self.status_policy, now);
        let result = score_stats(&stats);

        tracing::debug!(
            period_months = stats.period_months,
            transaction_count = stats.transaction_count,
            active_months = stats.active_months,
            avg_monthly_volume = stats.avg_monthly_volume,
            total_score = result.total_score,
            tier = result.tier,
            "Computed credit score"
        );

        result
    }
}

/// Score already-aggregated window statistics.
///
/// Every factor has a floor (50 + 100 + 100), so the result is at least 250 points.
pub fn score_stats(stats: &WindowStats) -> CreditScoreResult {
    CreditScoreResult::from_breakdown(ScoreBreakdown {
        volume_points: volume_points(stats.avg_monthly_volume),
        consistency_points: consistency_points(stats.consistency_rate),
        frequency_points: frequency_points(stats.transaction_count),
    })
}

/// Capacity to repay, from average monthly flow (max 400)
pub fn volume_points(avg_monthly_volume: f64) -> u32 {
    if !avg_monthly_volume.is_finite() {
        return VOLUME_FLOOR_POINTS;
    }

    if avg_monthly_volume > 500.0 {
        MAX_VOLUME_POINTS
    } else if avg_monthly_volume > 300.0 {
        250
    } else if avg_monthly_volume >= VOLUME_RAMP_START_USD {
        let ramp = (avg_monthly_volume - VOLUME_RAMP_START_USD) / VOLUME_RAMP_WIDTH_USD
            * VOLUME_RAMP_POINTS;
        VOLUME_FLOOR_POINTS + ramp.floor() as u32
    } else {
        VOLUME_FLOOR_POINTS
    }
}

/// Regularity of transfers across the window, a proxy for stable income (max 300)
pub fn consistency_points(consistency_rate: f64) -> u32 {
    if consistency_rate >= CONSISTENCY_HIGH_RATE {
        MAX_CONSISTENCY_POINTS
    } else if consistency_rate >= CONSISTENCY_MID_RATE {
        200
    } else {
        100
    }
}

/// Use of the service (max 300)
pub fn frequency_points(transaction_count: u32) -> u32 {
    if transaction_count > 10 {
        MAX_FREQUENCY_POINTS
    } else if transaction_count >= 5 {
        200
    } else {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_tier_from_score() {
        assert_eq!(CreditTier::from_score(1000), CreditTier::A);
        assert_eq!(CreditTier::from_score(800), CreditTier::A);
        assert_eq!(CreditTier::from_score(799), CreditTier::B);
        assert_eq!(CreditTier::from_score(500), CreditTier::B);
        assert_eq!(CreditTier::from_score(499), CreditTier::C);
        assert_eq!(CreditTier::from_score(300), CreditTier::C);
        assert_eq!(CreditTier::from_score(299), CreditTier::Unqualified);
        assert_eq!(CreditTier::from_score(0), CreditTier::Unqualified);
    }

    #[test]
    fn test_tier_badge_and_loan_stay_consistent() {
        for score in 0..=MAX_CREDIT_SCORE {
            let tier = CreditTier::from_score(score);
            let expected = match tier.number() {
                1 => (BadgeType::Gold, 500),
                2 => (BadgeType::Silver, 300),
                3 => (BadgeType::Bronze, 100),
                _ => (BadgeType::None, 0),
            };
            assert_eq!((tier.badge(), tier.max_loan_amount()), expected);
        }
    }

    #[test]
    fn test_volume_points_bands() {
        assert_eq!(volume_points(600.0), 400);
        assert_eq!(volume_points(500.01), 400);
        assert_eq!(volume_points(500.0), 250);
        assert_eq!(volume_points(300.01), 250);
        assert_eq!(volume_points(300.0), 200);
        assert_eq!(volume_points(200.0), 125);
        assert_eq!(volume_points(100.0), 50);
        assert_eq!(volume_points(99.99), 50);
        assert_eq!(volume_points(0.0), 50);
        assert_eq!(volume_points(f64::NAN), 50);
    }

    #[test]
    fn test_consistency_and_frequency_points() {
        assert_eq!(consistency_points(4.0 / 6.0), 300);
        assert_eq!(consistency_points(0.66), 300);
        assert_eq!(consistency_points(0.5), 200);
        assert_eq!(consistency_points(0.49), 100);

        assert_eq!(frequency_points(11), 300);
        assert_eq!(frequency_points(10), 200);
        assert_eq!(frequency_points(5), 200);
        assert_eq!(frequency_points(4), 100);
        assert_eq!(frequency_points(0), 100);
    }

    #[test]
    fn test_empty_result() {
        let result = CreditScoreResult::empty();
        assert_eq!(result.total_score, 0);
        assert_eq!(result.tier, 4);
        assert_eq!(result.badge_type, BadgeType::None);
        assert_eq!(result.max_loan_amount, 0);
        assert_eq!(result.breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(CreditScoreResult::empty()).unwrap();
        assert_eq!(json["totalScore"], 0);
        assert_eq!(json["badgeType"], "None");
        assert_eq!(json["maxLoanAmount"], 0);
        assert_eq!(json["breakdown"]["volumePoints"], 0);
    }
}
