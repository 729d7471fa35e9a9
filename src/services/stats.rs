//! Transaction statistics
//!
//! Two reductions over a remittance history:
//! - [`window_stats`]: the look-back window the scoring engine decides on;
//! - [`aggregate`]: whole-history figures shown to the customer. These never feed the
//!   tier decision.

use std::collections::HashSet;
use std::num::NonZeroU32;

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::Transaction;

/// Default look-back horizon for scoring, in months
pub const DEFAULT_PERIOD_MONTHS: u32 = 6;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Analysis window validation error
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Analysis period must be a positive number of months")]
pub struct InvalidWindow;

/// Look-back horizon applied to every scoring statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AnalysisWindow {
    period_months: NonZeroU32,
}

impl AnalysisWindow {
    pub fn new(period_months: u32) -> Result<Self, InvalidWindow> {
        NonZeroU32::new(period_months)
            .map(|period_months| Self { period_months })
            .ok_or(InvalidWindow)
    }

    pub fn period_months(&self) -> u32 {
        self.period_months.get()
    }

    /// Earliest instant still inside the window
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.period_months()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            period_months: NonZeroU32::new(DEFAULT_PERIOD_MONTHS).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl TryFrom<u32> for AnalysisWindow {
    type Error = InvalidWindow;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnalysisWindow> for u32 {
    fn from(window: AnalysisWindow) -> Self {
        window.period_months()
    }
}

/// Which transaction statuses count toward scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Every supplied transaction counts regardless of status
    #[default]
    IncludeAll,
    /// Only COMPLETED transfers count
    CompletedOnly,
}

impl StatusPolicy {
    pub fn admits(&self, tx: &Transaction) -> bool {
        match self {
            StatusPolicy::IncludeAll => true,
            StatusPolicy::CompletedOnly => tx.is_completed(),
        }
    }
}

/// Statistics over the scoring window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub period_months: u32,
    pub total_volume: f64,
    /// `total_volume / period_months`, regardless of how much of the window had activity
    pub avg_monthly_volume: f64,
    pub transaction_count: u32,
    /// Distinct (year, month) buckets with at least one transfer
    pub active_months: u32,
    /// `active_months / period_months`
    pub consistency_rate: f64,
}

/// Reduce a history to the statistics inside `window`, as of `now`.
pub fn window_stats(
    transactions: &[Transaction],
    window: AnalysisWindow,
    policy: StatusPolicy,
    now: DateTime<Utc>,
) -> WindowStats {
    let start = window.start(now);
    let period_months = window.period_months();

    let mut total_volume = 0.0;
    let mut transaction_count = 0u32;
    let mut months = HashSet::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.date >= start && policy.admits(tx))
    {
        total_volume += tx.contribution();
        transaction_count += 1;
        months.insert((tx.date.year(), tx.date.month()));
    }

    // A finite sum of finite terms can still overflow
    if !total_volume.is_finite() {
        total_volume = 0.0;
    }

    let active_months = months.len() as u32;

    WindowStats {
        period_months,
        total_volume,
        avg_monthly_volume: total_volume / period_months as f64,
        transaction_count,
        active_months,
        consistency_rate: active_months as f64 / period_months as f64,
    }
}

/// Whole-history statistics for display
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_volume: f64,
    /// Days between oldest and newest transfer, at least 1
    pub period_days: f64,
    /// `period_days / 30`, at least 1
    pub period_months: f64,
    pub avg_per_month: f64,
    pub transaction_count: u32,
    pub avg_transaction_size: f64,
    /// Presentation-only regularity score, 0-100 (2+ transfers a month = 100)
    pub consistency_score: f64,
    pub oldest_transaction_days: i64,
}

impl HistoryStats {
    /// Months of history behind the customer, one decimal
    pub fn history_months(&self) -> f64 {
        (self.oldest_transaction_days as f64 / 30.0 * 10.0).round() / 10.0
    }
}

/// Reduce the entire supplied history (no window) to display statistics.
pub fn aggregate(transactions: &[Transaction], now: DateTime<Utc>) -> HistoryStats {
    let (oldest, newest) = match (
        transactions.iter().map(|tx| tx.date).min(),
        transactions.iter().map(|tx| tx.date).max(),
    ) {
        (Some(oldest), Some(newest)) => (oldest, newest),
        _ => return HistoryStats::default(),
    };

    let mut total_volume: f64 = transactions.iter().map(Transaction::contribution).sum();
    if !total_volume.is_finite() {
        total_volume = 0.0;
    }

    let count = transactions.len() as f64;
    let span_days = (newest - oldest).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    let period_days = span_days.max(1.0);
    let period_months = (period_days / 30.0).max(1.0);

    let avg_per_month = total_volume / period_months;
    let avg_transaction_size = total_volume / count;
    let oldest_transaction_days = (now - oldest).num_days();
    let consistency_score = ((count / period_months) * 50.0).min(100.0);

    HistoryStats {
        total_volume: round_cents(total_volume),
        period_days,
        period_months,
        avg_per_month: round_cents(avg_per_month),
        transaction_count: transactions.len() as u32,
        avg_transaction_size: round_cents(avg_transaction_size),
        consistency_score: consistency_score.round(),
        oldest_transaction_days,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
