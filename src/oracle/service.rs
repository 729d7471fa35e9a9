//! Transaction history providers
//!
//! The scoring core only sees `Vec<Transaction>`. I'm putting the provider behind a trait so
//! the live remittance API and the synthetic generator are interchangeable.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use super::model::*;
use crate::identity::clean_identifier;

/// Errors raised while fetching remittance data
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Remittance provider unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Source of remittance history for a customer
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Transactions for a customer, newest first. Unknown customers yield an empty history.
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ProviderError>;

    /// Profile for a customer, `None` when the provider does not know them
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError>;

    /// Where this provider's data comes from
    fn source(&self) -> OracleSource;

    /// Profile and history fetched concurrently. `None` when the profile is unknown.
    async fn fetch_oracle_data(
        &self,
        user_id: &str,
    ) -> Result<Option<OracleResponse>, ProviderError> {
        let (user, transactions) =
            tokio::join!(self.fetch_profile(user_id), self.fetch_transactions(user_id));

        let user = match user? {
            Some(user) => user,
            None => return Ok(None),
        };
        let transactions = transactions?;

        let metadata = OracleMetadata {
            fetched_at: Utc::now(),
            source: self.source(),
            total_transactions: transactions.len(),
            period_months: covered_period_months(&transactions),
        };

        Ok(Some(OracleResponse {
            user,
            transactions,
            metadata,
        }))
    }
}

// ============================================================================
// Synthetic remittance oracle
// ============================================================================

/// Demo customer ids understood by the synthetic oracle
pub const USER_TIER_A: &str = "user_tier_a";
pub const USER_TIER_B: &str = "user_tier_b";
pub const USER_FAIL: &str = "user_fail";

/// Fallback id for RUTs that map to no demo profile
pub const USER_UNKNOWN: &str = "user_tier_c_mock";

const LATAM_COUNTRIES: [&str; 10] = ["MX", "GT", "SV", "HN", "NI", "CO", "PE", "EC", "BO", "PY"];
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Map a RUT to a demo customer by its check character.
///
/// `1`/`K` -> tier A, `2` -> tier B, `9` -> failing profile, anything else -> unknown.
pub fn user_id_for_rut(rut: &str) -> &'static str {
    match clean_identifier(rut).chars().last() {
        Some('1') | Some('K') => USER_TIER_A,
        Some('2') => USER_TIER_B,
        Some('9') => USER_FAIL,
        _ => USER_UNKNOWN,
    }
}

/// Synthetic remittance oracle reproducing the statistical shape of real customers
#[derive(Debug, Clone)]
pub struct MockRemittanceProvider {
    simulate_latency: bool,
}

impl Default for MockRemittanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemittanceProvider {
    pub fn new() -> Self {
        Self {
            simulate_latency: true,
        }
    }

    /// Toggle the simulated network latency (off in tests)
    pub fn with_latency(mut self, simulate_latency: bool) -> Self {
        self.simulate_latency = simulate_latency;
        self
    }

    async fn latency(&self, min_ms: u64, jitter_ms: u64) {
        if self.simulate_latency {
            let extra = rand::thread_rng().gen_range(0..jitter_ms.max(1));
            tokio::time::sleep(StdDuration::from_millis(min_ms + extra)).await;
        }
    }

    /// History for a customer id, generated relative to `now`
    pub fn generate_history(user_id: &str, now: DateTime<Utc>) -> Vec<Transaction> {
        let mut rng = rand::thread_rng();

        let mut transactions: Vec<Transaction> = match user_id.to_lowercase().as_str() {
            // 20 transfers, one every 10 days, $150-$220 each
            USER_TIER_A => (0..20)
                .map(|i| synthetic_transaction(&mut rng, now, i * 10, 150.0, 220.0))
                .collect(),
            // 10 transfers, one every 12 days, $100-$180 each
            USER_TIER_B => (0..10)
                .map(|i| synthetic_transaction(&mut rng, now, i * 12, 100.0, 180.0))
                .collect(),
            USER_FAIL => vec![
                fixed_transaction(&mut rng, now, 30, 50.0, "MX"),
                fixed_transaction(&mut rng, now, 60, 50.0, "GT"),
            ],
            _ => Vec::new(),
        };

        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    /// Profile for a customer id, `None` for unknown ids
    pub fn profile(user_id: &str, now: DateTime<Utc>) -> Option<UserProfile> {
        let (id, name, kyc_level, registered_days_ago) = match user_id.to_lowercase().as_str() {
            USER_TIER_A => (USER_TIER_A, "María García", KycLevel::Full, 365),
            USER_TIER_B => (USER_TIER_B, "Carlos Rodríguez", KycLevel::Intermediate, 180),
            USER_FAIL => (USER_FAIL, "Ana López", KycLevel::Basic, 30),
            _ => return None,
        };

        Some(UserProfile {
            id: id.to_string(),
            name: name.to_string(),
            kyc_level,
            country: "CL".to_string(),
            registered_at: now - Duration::days(registered_days_ago),
        })
    }
}

#[async_trait]
impl TransactionProvider for MockRemittanceProvider {
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ProviderError> {
        self.latency(200, 300).await;
        let transactions = Self::generate_history(user_id, Utc::now());
        tracing::debug!(
            user_id = %user_id,
            count = transactions.len(),
            "Generated synthetic remittance history"
        );
        Ok(transactions)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError> {
        self.latency(100, 200).await;
        Ok(Self::profile(user_id, Utc::now()))
    }

    fn source(&self) -> OracleSource {
        OracleSource::Mock
    }
}

fn transaction_id(rng: &mut impl Rng) -> String {
    let suffix: String = (0..8)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("MGT-{}", suffix)
}

fn synthetic_transaction(
    rng: &mut impl Rng,
    now: DateTime<Utc>,
    days_ago: i64,
    min: f64,
    max: f64,
) -> Transaction {
    // Rounded to cents
    let amount = (rng.gen_range(min..max) * 100.0).round() / 100.0;
    let country = LATAM_COUNTRIES[rng.gen_range(0..LATAM_COUNTRIES.len())];
    fixed_transaction(rng, now, days_ago, amount, country)
}

fn fixed_transaction(
    rng: &mut impl Rng,
    now: DateTime<Utc>,
    days_ago: i64,
    amount: f64,
    country: &str,
) -> Transaction {
    Transaction {
        id: transaction_id(rng),
        amount_usd: amount,
        date: now - Duration::days(days_ago),
        currency: "USD".to_string(),
        recipient_country: country.to_string(),
        status: TransactionStatus::Completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_for_rut() {
        assert_eq!(user_id_for_rut("12.345.678-1"), USER_TIER_A);
        assert_eq!(user_id_for_rut("7654321-k"), USER_TIER_A);
        assert_eq!(user_id_for_rut("7654321-2"), USER_TIER_B);
        assert_eq!(user_id_for_rut("12345678-9"), USER_FAIL);
        assert_eq!(user_id_for_rut("12345678-5"), USER_UNKNOWN);
        assert_eq!(user_id_for_rut(""), USER_UNKNOWN);
    }

    #[test]
    fn test_tier_a_history_shape() {
        let now = Utc::now();
        let history = MockRemittanceProvider::generate_history(USER_TIER_A, now);

        assert_eq!(history.len(), 20);
        assert!(history.windows(2).all(|w| w[0].date >= w[1].date));
        assert!(history
            .iter()
            .all(|tx| tx.amount_usd >= 150.0 && tx.amount_usd <= 220.0));
        assert!(history.iter().all(|tx| tx.id.starts_with("MGT-") && tx.id.len() == 12));
        assert!(history
            .iter()
            .all(|tx| LATAM_COUNTRIES.contains(&tx.recipient_country.as_str())));
    }

    #[test]
    fn test_fail_history_is_fixed() {
        let history = MockRemittanceProvider::generate_history(USER_FAIL, Utc::now());
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|tx| tx.amount_usd == 50.0));
        assert_eq!(history[0].recipient_country, "MX");
    }

    #[test]
    fn test_unknown_user_has_no_data() {
        let now = Utc::now();
        assert!(MockRemittanceProvider::generate_history("nobody", now).is_empty());
        assert!(MockRemittanceProvider::profile("nobody", now).is_none());
    }

    #[tokio::test]
    async fn test_fetch_oracle_data() {
        let provider = MockRemittanceProvider::new().with_latency(false);

        let data = provider
            .fetch_oracle_data(USER_TIER_B)
            .await
            .unwrap()
            .expect("tier B profile exists");
        assert_eq!(data.user.kyc_level, KycLevel::Intermediate);
        assert_eq!(data.metadata.total_transactions, 10);
        assert_eq!(data.metadata.source, OracleSource::Mock);
        // 108 days between first and last transfer
        assert_eq!(data.metadata.period_months, 4);

        let missing = provider.fetch_oracle_data("nobody").await.unwrap();
        assert!(missing.is_none());
    }
}
