//! Configuration management for Vigente
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::attestation::{AttestationError, AttestationService, AttestationSigner, ScAddressCodec};
use crate::identity::IdentityHasher;
use crate::services::{AnalysisWindow, ScoringEngine, StatusPolicy};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Stellar secret seed (`S...`) of the oracle signing key
    pub oracle_signing_secret: Option<String>,

    /// Key for the identity digest; attestations are disabled without it
    pub identity_hash_secret: Option<String>,

    /// Scoring look-back window in months (default: 6)
    pub scoring_period_months: u32,

    /// Which transaction statuses count toward the score
    pub scoring_status_policy: StatusPolicy,

    /// Simulate network latency in the mock remittance oracle
    pub mock_oracle_latency: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").filter(|s| !s.trim().is_empty());

        let oracle_signing_secret =
            lookup("ORACLE_SIGNING_SECRET").filter(|s| !s.trim().is_empty());

        let identity_hash_secret = lookup("IDENTITY_HASH_SECRET").filter(|s| !s.is_empty());

        let scoring_period_months = match lookup("SCORING_PERIOD_MONTHS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|months| *months > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "SCORING_PERIOD_MONTHS must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => crate::services::stats::DEFAULT_PERIOD_MONTHS,
        };

        let scoring_status_policy = match lookup("SCORING_STATUS_POLICY") {
            Some(raw) => parse_status_policy(&raw)?,
            None => StatusPolicy::default(),
        };

        let mock_oracle_latency = match lookup("MOCK_ORACLE_LATENCY") {
            Some(raw) => parse_bool("MOCK_ORACLE_LATENCY", &raw)?,
            None => true,
        };

        Ok(Config {
            environment,
            port,
            log_level,
            cors_allowed_origins,
            oracle_signing_secret,
            identity_hash_secret,
            scoring_period_months,
            scoring_status_policy,
            mock_oracle_latency,
        })
    }

    /// Scoring engine with the configured window and status policy
    pub fn scoring_engine(&self) -> Result<ScoringEngine, ConfigError> {
        let window = AnalysisWindow::new(self.scoring_period_months)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        Ok(ScoringEngine::new(window, self.scoring_status_policy))
    }

    /// Attestation service from the configured key material.
    ///
    /// `Ok(None)` when either secret is missing; a bad secret is an error.
    pub fn attestation_service(&self) -> Result<Option<AttestationService>, AttestationError> {
        let (signing_secret, hash_secret) =
            match (&self.oracle_signing_secret, &self.identity_hash_secret) {
                (Some(signing), Some(hash)) => (signing, hash),
                _ => return Ok(None),
            };

        let signer = AttestationSigner::from_stellar_secret(signing_secret)?;
        let hasher = IdentityHasher::new(hash_secret.as_bytes())?;

        Ok(Some(AttestationService::new(
            hasher,
            signer,
            Arc::new(ScAddressCodec),
        )))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("oracle_signing_secret", &mask(&self.oracle_signing_secret))
            .field("identity_hash_secret", &mask(&self.identity_hash_secret))
            .field("scoring_period_months", &self.scoring_period_months)
            .field("scoring_status_policy", &self.scoring_status_policy)
            .field("mock_oracle_latency", &self.mock_oracle_latency)
            .finish()
    }
}

fn mask(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "****")
}

fn parse_status_policy(raw: &str) -> Result<StatusPolicy, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "all" | "include_all" => Ok(StatusPolicy::IncludeAll),
        "completed" | "completed_only" => Ok(StatusPolicy::CompletedOnly),
        _ => Err(ConfigError::InvalidValue(format!(
            "Invalid SCORING_STATUS_POLICY: '{}'. Expected: all or completed",
            raw
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "SB7G3OJIVJR2MUJT6WCGPMFJPASEF5KDBG2CMOUCLDNRLPNLSK5JCDDT";

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            Environment::from_str("dev").unwrap(),
            Environment::Development
        );
        assert_eq!(
            Environment::from_str("staging").unwrap(),
            Environment::Staging
        );
        assert_eq!(
            Environment::from_str("production").unwrap(),
            Environment::Production
        );

        // Case insensitive
        assert_eq!(
            Environment::from_str("PROD").unwrap(),
            Environment::Production
        );

        // Invalid
        assert!(Environment::from_str("invalid").is_err());
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
        assert_eq!(Environment::Staging.as_str(), "staging");
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 3001);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scoring_period_months, 6);
        assert_eq!(config.scoring_status_policy, StatusPolicy::IncludeAll);
        assert!(config.mock_oracle_latency);
        assert!(config.attestation_service().unwrap().is_none());
    }

    #[test]
    fn test_scoring_settings() {
        let config = load(&[
            ("SCORING_PERIOD_MONTHS", "12"),
            ("SCORING_STATUS_POLICY", "completed"),
            ("MOCK_ORACLE_LATENCY", "false"),
        ])
        .unwrap();

        let engine = config.scoring_engine().unwrap();
        assert_eq!(engine.window().period_months(), 12);
        assert_eq!(engine.status_policy(), StatusPolicy::CompletedOnly);
        assert!(!config.mock_oracle_latency);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(load(&[("SCORING_PERIOD_MONTHS", "0")]).is_err());
        assert!(load(&[("SCORING_STATUS_POLICY", "pending")]).is_err());
        assert!(load(&[("MOCK_ORACLE_LATENCY", "maybe")]).is_err());
    }

    #[test]
    fn test_attestation_service_from_secrets() {
        let config = load(&[
            ("ORACLE_SIGNING_SECRET", SECRET),
            ("IDENTITY_HASH_SECRET", "identity-secret"),
        ])
        .unwrap();
        let service = config.attestation_service().unwrap().unwrap();
        assert_eq!(
            service.signer_public_key(),
            "GAJT5NOKLJYDMO6WSUQAKYAWSH56YLPXLZTYPFP3PIJAKZ4PH7S235TU"
        );

        let config = load(&[
            ("ORACLE_SIGNING_SECRET", "SNOTAVALIDSEED"),
            ("IDENTITY_HASH_SECRET", "identity-secret"),
        ])
        .unwrap();
        let err = config.attestation_service().unwrap_err();
        assert!(err.is_key_material());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = load(&[
            ("ORACLE_SIGNING_SECRET", SECRET),
            ("IDENTITY_HASH_SECRET", "identity-secret"),
        ])
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("****"));
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("identity-secret"));
    }

    #[test]
    fn test_config_error_types() {
        let err = ConfigError::InvalidPort("invalid".to_string());
        assert!(err.to_string().contains("invalid"));
    }
}
