//! On-chain credit attestations
//!
//! I'm keeping the whole byte-level contract with the Soroban verifier in this
//! module: address codec, payload layout, signing and the service gluing them.

pub mod address;
pub mod payload;
mod service;
pub mod signer;
pub mod strkey;

use thiserror::Error;

use crate::identity::IdentityError;

pub use address::{AddressCodec, ScAddressCodec};
pub use payload::{AttestationPayload, PayloadVersion};
pub use service::{Attestation, AttestationRequest, AttestationService};
pub use signer::{verify_with_public_key, AttestationSignature, AttestationSigner};

/// Errors raised while encoding addresses
#[derive(Error, Debug)]
pub enum AddressError {
    #[error("Invalid Stellar address format: {0}")]
    InvalidFormat(String),

    #[error("Invalid address checksum")]
    InvalidChecksum,

    #[error("Unsupported address: {0}")]
    UnsupportedAddress(String),

    #[error("Address encoding failed: {0}")]
    Encoding(String),
}

/// Errors raised while producing or checking attestations
#[derive(Error, Debug)]
pub enum AttestationError {
    #[error("Invalid oracle signing key: {0}")]
    InvalidSecretKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AttestationError {
    /// Key-material failures are configuration problems, not caller mistakes
    pub fn is_key_material(&self) -> bool {
        match self {
            AttestationError::InvalidSecretKey(_) => true,
            AttestationError::Identity(e) => e.is_key_material(),
            _ => false,
        }
    }
}
