//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::attestation::AttestationService;
use crate::config::Config;
use crate::oracle::TransactionProvider;
use crate::services::ScoringEngine;

/// Whether attestations can be signed in this process
#[derive(Clone, Debug)]
pub enum AttestationSetup {
    Ready(Arc<AttestationService>),
    /// Scoring still works; the reason is surfaced on every attestation request
    Unavailable(String),
}

impl AttestationSetup {
    /// Build the attestation service from configured key material.
    ///
    /// Key errors are configuration problems and never stop the server.
    pub fn from_config(config: &Config) -> Self {
        match config.attestation_service() {
            Ok(Some(service)) => {
                tracing::info!(
                    signer = %service.signer_public_key(),
                    version = ?service.version(),
                    "Attestation signing enabled"
                );
                AttestationSetup::Ready(Arc::new(service))
            }
            Ok(None) => {
                tracing::warn!(
                    "ORACLE_SIGNING_SECRET or IDENTITY_HASH_SECRET not set, attestations disabled"
                );
                AttestationSetup::Unavailable(
                    "Attestation signing is not configured".to_string(),
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "Invalid attestation key material, attestations disabled");
                AttestationSetup::Unavailable(e.to_string())
            }
        }
    }

    pub fn service(&self) -> Result<&Arc<AttestationService>, &str> {
        match self {
            AttestationSetup::Ready(service) => Ok(service),
            AttestationSetup::Unavailable(reason) => Err(reason.as_str()),
        }
    }

    pub fn signer_public_key(&self) -> Option<String> {
        self.service().ok().map(|service| service.signer_public_key())
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TransactionProvider>,
    pub scoring_engine: ScoringEngine,
    pub attestation: AttestationSetup,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn TransactionProvider>,
        scoring_engine: ScoringEngine,
        attestation: AttestationSetup,
    ) -> Self {
        Self {
            provider,
            scoring_engine,
            attestation,
        }
    }
}

impl FromRef<AppState> for AttestationSetup {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.attestation.clone()
    }
}
