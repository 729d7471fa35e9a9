//! Identity digest derivation
//!
//! The raw identifier never goes on-chain. I'm binding attestations to an
//! HMAC-SHA256 of the cleaned identifier keyed with a server-held secret, so only
//! this service can produce a digest for a given identifier. Everyone else has to
//! be handed the digest and forward it unchanged.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::IdentityError;

type HmacSha256 = Hmac<Sha256>;

/// Digest length in bytes
pub const IDENTITY_DIGEST_LEN: usize = 32;

/// Normalize formatting variants of an identifier: keep digits and the `K` check
/// character, upper-cased. `"12.345.678-k"` becomes `"12345678K"`.
pub fn clean_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Keyed one-way digest of a personal identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct IdentityDigest([u8; IDENTITY_DIGEST_LEN]);

impl IdentityDigest {
    pub fn from_bytes(bytes: [u8; IDENTITY_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest previously handed out as hex
    pub fn from_hex(value: &str) -> Result<Self, IdentityError> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| IdentityError::InvalidDigest(e.to_string()))?;
        let bytes: [u8; IDENTITY_DIGEST_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            IdentityError::InvalidDigest(format!(
                "Expected {} bytes, got {}",
                IDENTITY_DIGEST_LEN,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityDigest({})", self.to_hex())
    }
}

impl fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for IdentityDigest {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<IdentityDigest> for String {
    fn from(digest: IdentityDigest) -> Self {
        digest.to_hex()
    }
}

impl TryFrom<String> for IdentityDigest {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// Holder of the identity secret. The only component able to derive digests.
#[derive(Clone)]
pub struct IdentityHasher {
    secret: Vec<u8>,
}

impl IdentityHasher {
    /// Create a hasher keyed with the server secret
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, IdentityError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(IdentityError::EmptySecret);
        }
        Ok(Self { secret })
    }

    /// HMAC-SHA256(secret, clean_identifier(raw))
    pub fn derive(&self, raw_identifier: &str) -> Result<IdentityDigest, IdentityError> {
        let cleaned = clean_identifier(raw_identifier);
        if cleaned.is_empty() {
            return Err(IdentityError::EmptyIdentifier);
        }

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| IdentityError::InvalidSecret(e.to_string()))?;
        mac.update(cleaned.as_bytes());
        let bytes: [u8; IDENTITY_DIGEST_LEN] = mac.finalize().into_bytes().into();

        Ok(IdentityDigest(bytes))
    }
}

impl fmt::Debug for IdentityHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityHasher")
            .field("secret", &"****")
            .finish()
    }
}
