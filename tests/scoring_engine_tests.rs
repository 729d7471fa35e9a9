//! Credit Scoring Engine Tests
//!
//! These tests validate the remittance scoring rules end to end: tier steps,
//! factor bands, window handling and the synthetic oracle's demo profiles.

use chrono::{DateTime, Duration, TimeZone, Utc};

use vigente_server::oracle::{
    MockRemittanceProvider, Transaction, TransactionStatus, USER_FAIL, USER_TIER_A, USER_TIER_B,
};
use vigente_server::services::{
    AnalysisWindow, BadgeType, CreditScoreResult, CreditTier, ScoreBreakdown, ScoringEngine,
    StatusPolicy,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
}

fn transfer(days_ago: i64, amount: f64, status: TransactionStatus) -> Transaction {
    Transaction {
        id: format!("MGT-T{:07}", days_ago),
        amount_usd: amount,
        date: now() - Duration::days(days_ago),
        currency: "USD".to_string(),
        recipient_country: "CO".to_string(),
        status,
    }
}

/// `count` completed transfers of `amount`, one every `every_days`
fn history(count: i64, every_days: i64, amount: f64) -> Vec<Transaction> {
    (0..count)
        .map(|i| transfer(i * every_days, amount, TransactionStatus::Completed))
        .collect()
}

fn score(transactions: &[Transaction]) -> CreditScoreResult {
    ScoringEngine::default().score_at(transactions, now())
}

// ============================================================================
// Tier Classification Tests
// ============================================================================

#[test]
fn test_tier_steps() {
    let cases = [
        (1000, 1),
        (800, 1),
        (799, 2),
        (500, 2),
        (499, 3),
        (300, 3),
        (299, 4),
        (150, 4),
        (0, 4),
    ];
    for (total, tier) in cases {
        assert_eq!(CreditTier::from_score(total).number(), tier, "score {}", total);
    }
}

#[test]
fn test_tier_labels_and_capability() {
    assert_eq!(CreditTier::A.label(), "A");
    assert_eq!(CreditTier::Unqualified.label(), "D");
    assert_eq!(CreditTier::A.capability(), "EXCELLENT");
    assert_eq!(CreditTier::B.capability(), "GOOD");
    assert_eq!(CreditTier::C.capability(), "FAIR");
    assert_eq!(CreditTier::Unqualified.capability(), "INSUFFICIENT");
}

#[test]
fn test_tier_is_monotonic_in_score() {
    let mut previous = CreditTier::from_score(0).number();
    for total in 1..=1000 {
        let tier = CreditTier::from_score(total).number();
        assert!(tier <= previous, "tier rose from {} to {} at {}", previous, tier, total);
        previous = tier;
    }
}

// ============================================================================
// Scoring Properties
// ============================================================================

#[test]
fn test_empty_history_scores_exactly_zero() {
    let result = score(&[]);
    assert_eq!(
        result,
        CreditScoreResult {
            total_score: 0,
            tier: 4,
            badge_type: BadgeType::None,
            max_loan_amount: 0,
            breakdown: ScoreBreakdown {
                volume_points: 0,
                consistency_points: 0,
                frequency_points: 0,
            },
        }
    );
}

#[test]
fn test_non_empty_scores_are_sums_within_range() {
    for count in 1..=25 {
        for every_days in [1, 7, 15, 30, 45] {
            for amount in [0.0, 25.0, 180.0, 450.0, 2_000.0] {
                let result = score(&history(count, every_days, amount));
                assert_eq!(result.total_score, result.breakdown.total());
                assert!((250..=1000).contains(&result.total_score));
                assert_eq!(result.credit_tier().number(), result.tier);
            }
        }
    }
}

#[test]
fn test_history_outside_window_still_scores_floor() {
    let result = score(&[transfer(400, 10_000.0, TransactionStatus::Completed)]);
    assert_eq!(
        result.breakdown,
        ScoreBreakdown {
            volume_points: 50,
            consistency_points: 100,
            frequency_points: 100,
        }
    );
    assert_eq!(result.total_score, 250);
    assert_eq!(result.tier, 4);
}

#[test]
fn test_avg_600_gives_full_volume_points() {
    // 6 x $600 across the 6-month window = $600/month
    let result = score(&history(6, 30, 600.0));
    assert_eq!(result.breakdown.volume_points, 400);
}

#[test]
fn test_avg_200_gives_ramp_volume_points() {
    // 6 x $200 across the 6-month window = $200/month
    let result = score(&history(6, 30, 200.0));
    assert_eq!(result.breakdown.volume_points, 125);
}

#[test]
fn test_high_volume_regular_sender_is_tier_a() {
    let result = score(&history(24, 7, 400.0));
    assert_eq!(result.total_score, 1000);
    assert_eq!(result.tier, 1);
    assert_eq!(result.badge_type, BadgeType::Gold);
    assert_eq!(result.max_loan_amount, 500);
}

#[test]
fn test_wider_window_dilutes_average() {
    let transactions = history(6, 30, 600.0);
    let twelve = ScoringEngine::default()
        .with_window(AnalysisWindow::new(12).unwrap())
        .score_at(&transactions, now());
    // $3600 over 12 months = $300/month
    assert_eq!(twelve.breakdown.volume_points, 200);
}

#[test]
fn test_completed_only_policy_ignores_cancelled() {
    let mut transactions = history(3, 30, 100.0);
    transactions.extend(
        (0..10).map(|i| transfer(i * 5 + 1, 1_000.0, TransactionStatus::Cancelled)),
    );

    let all = ScoringEngine::default().score_at(&transactions, now());
    let completed = ScoringEngine::new(AnalysisWindow::default(), StatusPolicy::CompletedOnly)
        .score_at(&transactions, now());

    assert_eq!(all.breakdown.volume_points, 400);
    assert_eq!(all.breakdown.frequency_points, 300);
    assert_eq!(completed.breakdown.volume_points, 50);
    assert_eq!(completed.breakdown.frequency_points, 100);
}

// ============================================================================
// Synthetic Oracle Profiles
// ============================================================================

#[test]
fn test_demo_profiles_land_in_expected_tiers() {
    let engine = ScoringEngine::default();

    let tier_a = engine.score_at(&MockRemittanceProvider::generate_history(USER_TIER_A, now()), now());
    assert_eq!(tier_a.tier, 1);

    let tier_b = engine.score_at(&MockRemittanceProvider::generate_history(USER_TIER_B, now()), now());
    assert!(tier_b.tier <= 2, "tier B profile scored {}", tier_b.total_score);

    let fail = engine.score_at(&MockRemittanceProvider::generate_history(USER_FAIL, now()), now());
    assert_eq!(fail.tier, 4);
    assert_eq!(fail.max_loan_amount, 0);
}
