//! Vigente Credit Oracle
//!
//! Remittance-based credit scoring for thin-file customers, a keyed identity digest
//! standing in for their national id, and ed25519-signed attestations a Soroban
//! contract can verify.

pub mod attestation;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod oracle;
pub mod routes;
pub mod services;
pub mod state;
