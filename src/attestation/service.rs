//! Attestation service
//!
//! Ties identity digest, address codec, payload and signer together for one
//! attestation request. Everything here is synchronous and stateless: the service
//! only holds immutable key material and the codec.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::address::AddressCodec;
use super::payload::{AttestationPayload, PayloadVersion};
use super::signer::{AttestationSignature, AttestationSigner};
use super::AttestationError;
use crate::identity::{IdentityDigest, IdentityHasher};

/// Input for a fresh attestation
#[derive(Debug, Clone)]
pub struct AttestationRequest<'a> {
    /// Target identity in the codec's textual form (a Stellar address for Soroban)
    pub address: &'a str,
    pub tier: u32,
    pub score: u32,
    /// Raw personal identifier; only its digest leaves this service
    pub identifier: &'a str,
}

/// Signed attestation, hex-encoded for text boundaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub version: PayloadVersion,
    pub address: String,
    pub tier: u32,
    pub score: u32,
    /// Forward this verbatim to any later step; it cannot be recomputed without the secret
    pub identity_digest: IdentityDigest,
    pub payload: String,
    /// SHA-256 of the payload
    pub payload_hash: String,
    pub signature: String,
    /// Stellar account id of the signing key
    pub signer_public_key: String,
}

/// Issues signed attestations
#[derive(Clone)]
pub struct AttestationService {
    hasher: IdentityHasher,
    signer: AttestationSigner,
    codec: Arc<dyn AddressCodec>,
    version: PayloadVersion,
}

impl AttestationService {
    pub fn new(
        hasher: IdentityHasher,
        signer: AttestationSigner,
        codec: Arc<dyn AddressCodec>,
    ) -> Self {
        Self {
            hasher,
            signer,
            codec,
            version: PayloadVersion::default(),
        }
    }

    pub fn version(&self) -> PayloadVersion {
        self.version
    }

    pub fn signer_public_key(&self) -> String {
        self.signer.public_key_strkey()
    }

    /// Derive the identity digest once, then build and sign the payload
    pub fn attest(&self, request: &AttestationRequest<'_>) -> Result<Attestation, AttestationError> {
        let digest = self.hasher.derive(request.identifier)?;
        self.attest_with_digest(request.address, request.tier, request.score, &digest)
    }

    /// Build and sign with a digest handed out earlier. Same inputs, same bytes.
    pub fn attest_with_digest(
        &self,
        address: &str,
        tier: u32,
        score: u32,
        digest: &IdentityDigest,
    ) -> Result<Attestation, AttestationError> {
        let (payload, signature) = self.sign_payload(address, tier, score, digest)?;
        let digest_hex = digest.to_hex();

        tracing::info!(
            codec = self.codec.name(),
            version = ?self.version,
            tier = tier,
            score = score,
            payload_len = payload.len(),
            digest_prefix = %&digest_hex[..8],
            "Signed credit attestation"
        );

        Ok(Attestation {
            version: self.version,
            address: address.trim().to_string(),
            tier,
            score,
            identity_digest: *digest,
            payload: payload.to_hex(),
            payload_hash: hex::encode(payload.hash()),
            signature: signature.to_hex(),
            signer_public_key: self.signer.public_key_strkey(),
        })
    }

    /// Payload and signature as raw values
    pub fn sign_payload(
        &self,
        address: &str,
        tier: u32,
        score: u32,
        digest: &IdentityDigest,
    ) -> Result<(AttestationPayload, AttestationSignature), AttestationError> {
        let address_encoding = self.codec.encode(address)?;
        let payload = AttestationPayload::build(self.version, &address_encoding, tier, score, digest);
        let signature = self.signer.sign(&payload);
        Ok((payload, signature))
    }
}

impl std::fmt::Debug for AttestationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestationService")
            .field("hasher", &self.hasher)
            .field("signer", &self.signer)
            .field("codec", &self.codec.name())
            .field("version", &self.version)
            .finish()
    }
}
