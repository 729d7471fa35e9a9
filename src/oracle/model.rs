//! Remittance oracle models
//!
//! I'm defining the transaction shape here exactly as the remittance oracle hands it to us.
//! Everything downstream (stats, scoring) only depends on these types, never on where
//! the records came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settlement status of a remittance transfer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Cancelled,
}

/// A single remittance transfer, normalized to USD
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque transfer id (MGT-XXXXXXXX for the synthetic oracle)
    pub id: String,
    /// Amount in USD, normalized from the source currency
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
    /// When the transfer was made
    pub date: DateTime<Utc>,
    /// Original currency code
    pub currency: String,
    /// Recipient country (ISO 3166-1 alpha-2)
    pub recipient_country: String,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Amount as a scoring contribution. Non-finite amounts count as zero.
    pub fn contribution(&self) -> f64 {
        if self.amount_usd.is_finite() {
            self.amount_usd
        } else {
            0.0
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// KYC verification level of a remittance customer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum KycLevel {
    Basic,
    Intermediate,
    Full,
}

impl TryFrom<u8> for KycLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KycLevel::Basic),
            2 => Ok(KycLevel::Intermediate),
            3 => Ok(KycLevel::Full),
            other => Err(format!("Invalid KYC level: {}", other)),
        }
    }
}

impl From<KycLevel> for u8 {
    fn from(level: KycLevel) -> Self {
        match level {
            KycLevel::Basic => 1,
            KycLevel::Intermediate => 2,
            KycLevel::Full => 3,
        }
    }
}

/// Customer profile as known by the remittance provider
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    /// Display name (already sanitized by the provider)
    pub name: String,
    pub kyc_level: KycLevel,
    /// Country of residence
    pub country: String,
    pub registered_at: DateTime<Utc>,
}

/// Where the oracle data came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OracleSource {
    Mock,
    Sandbox,
    Production,
}

/// Metadata attached to an oracle fetch
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OracleMetadata {
    pub fetched_at: DateTime<Utc>,
    pub source: OracleSource,
    pub total_transactions: usize,
    /// Months spanned by the returned history, rounded up (0 with fewer than two records)
    pub period_months: u32,
}

/// Profile plus transaction history for one customer
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OracleResponse {
    pub user: UserProfile,
    pub transactions: Vec<Transaction>,
    pub metadata: OracleMetadata,
}

/// Number of 30-day months spanned by a history, rounded up.
pub fn covered_period_months(transactions: &[Transaction]) -> u32 {
    if transactions.len() < 2 {
        return 0;
    }

    let oldest = transactions.iter().map(|tx| tx.date).min();
    let newest = transactions.iter().map(|tx| tx.date).max();

    match (oldest, newest) {
        (Some(oldest), Some(newest)) => {
            let span_ms = (newest - oldest).num_milliseconds() as f64;
            let month_ms = 30.0 * 24.0 * 60.0 * 60.0 * 1000.0;
            (span_ms / month_ms).ceil() as u32
        }
        _ => 0,
    }
}
