//! Attestation payload construction
//!
//! The one place attestation bytes are assembled. The external verifier rebuilds
//! the same sequence independently, so any change here is a new [`PayloadVersion`],
//! never an edit to an existing one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::{IdentityDigest, IDENTITY_DIGEST_LEN};

/// Width of the big-endian tier and score fields
const U32_LEN: usize = 4;

/// Layout version of the signed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadVersion {
    /// `address ‖ tier (u32 BE) ‖ score (u32 BE) ‖ identity digest (32 bytes)`
    #[default]
    V1,
}

/// Canonical bytes an attestation signature covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationPayload {
    version: PayloadVersion,
    address_len: usize,
    bytes: Vec<u8>,
}

impl AttestationPayload {
    /// Assemble the payload for `version`.
    ///
    /// `address_encoding` must come from the verifier's own address codec; it is
    /// copied verbatim with no length prefix.
    pub fn build(
        version: PayloadVersion,
        address_encoding: &[u8],
        tier: u32,
        score: u32,
        digest: &IdentityDigest,
    ) -> Self {
        match version {
            PayloadVersion::V1 => {
                let mut bytes = Vec::with_capacity(Self::v1_len(address_encoding.len()));
                bytes.extend_from_slice(address_encoding);
                bytes.extend_from_slice(&tier.to_be_bytes());
                bytes.extend_from_slice(&score.to_be_bytes());
                bytes.extend_from_slice(digest.as_bytes());

                Self {
                    version,
                    address_len: address_encoding.len(),
                    bytes,
                }
            }
        }
    }

    /// Total V1 length for an address encoding of `address_len` bytes
    pub fn v1_len(address_len: usize) -> usize {
        address_len + U32_LEN + U32_LEN + IDENTITY_DIGEST_LEN
    }

    pub fn version(&self) -> PayloadVersion {
        self.version
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn address_encoding(&self) -> &[u8] {
        &self.bytes[..self.address_len]
    }

    pub fn tier(&self) -> u32 {
        self.read_u32(self.address_len)
    }

    pub fn score(&self) -> u32 {
        self.read_u32(self.address_len + U32_LEN)
    }

    pub fn identity_digest(&self) -> IdentityDigest {
        let start = self.address_len + 2 * U32_LEN;
        let mut digest = [0u8; IDENTITY_DIGEST_LEN];
        digest.copy_from_slice(&self.bytes[start..start + IDENTITY_DIGEST_LEN]);
        IdentityDigest::from_bytes(digest)
    }

    /// SHA-256 of the payload bytes
    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(&self.bytes).into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    fn read_u32(&self, offset: usize) -> u32 {
        let mut field = [0u8; U32_LEN];
        field.copy_from_slice(&self.bytes[offset..offset + U32_LEN]);
        u32::from_be_bytes(field)
    }
}

impl AsRef<[u8]> for AttestationPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
