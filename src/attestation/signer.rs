//! Attestation signing
//!
//! Ed25519 over the canonical payload with the oracle's key. The verifier contract
//! knows the matching public key out of band.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use super::payload::AttestationPayload;
use super::strkey::{self, StrkeyKind};
use super::AttestationError;

/// Signature length in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Detached ed25519 signature over an attestation payload
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AttestationSignature([u8; SIGNATURE_LEN]);

impl AttestationSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(value: &str) -> Result<Self, AttestationError> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| AttestationError::InvalidSignature(e.to_string()))?;
        let bytes: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            AttestationError::InvalidSignature(format!(
                "Expected {} bytes, got {}",
                SIGNATURE_LEN,
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for AttestationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttestationSignature({})", self.to_hex())
    }
}

/// Holder of the oracle signing key
#[derive(Clone)]
pub struct AttestationSigner {
    signing_key: SigningKey,
}

impl AttestationSigner {
    /// Signer from a raw 32-byte ed25519 seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Signer from a Stellar secret seed (`S...`)
    pub fn from_stellar_secret(secret: &str) -> Result<Self, AttestationError> {
        let seed = strkey::decode(StrkeyKind::SecretSeed, secret)
            .map_err(|e| AttestationError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_seed(seed))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key as a Stellar account id (`G...`)
    pub fn public_key_strkey(&self) -> String {
        strkey::encode(StrkeyKind::AccountId, &self.public_key())
    }

    /// Sign the payload. Ed25519 is deterministic: same key and payload, same bytes.
    pub fn sign(&self, payload: &AttestationPayload) -> AttestationSignature {
        let signature = self.signing_key.sign(payload.as_bytes());
        AttestationSignature(signature.to_bytes())
    }

    /// Check a signature against this signer's public key
    pub fn verify(&self, payload: &AttestationPayload, signature: &AttestationSignature) -> bool {
        verify_with_public_key(&self.public_key(), payload, signature).is_ok()
    }
}

impl fmt::Debug for AttestationSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestationSigner")
            .field("public_key", &self.public_key_strkey())
            .finish()
    }
}

/// Verify a payload signature the way the external verifier does
pub fn verify_with_public_key(
    public_key: &[u8; 32],
    payload: &AttestationPayload,
    signature: &AttestationSignature,
) -> Result<(), AttestationError> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| AttestationError::InvalidPublicKey(e.to_string()))?;
    let signature = Signature::from_bytes(&signature.0);

    verifying_key
        .verify(payload.as_bytes(), &signature)
        .map_err(|_| AttestationError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::payload::PayloadVersion;
    use crate::identity::IdentityDigest;

    const SECRET: &str = "SB7G3OJIVJR2MUJT6WCGPMFJPASEF5KDBG2CMOUCLDNRLPNLSK5JCDDT";
    const PUBLIC: &str = "GAJT5NOKLJYDMO6WSUQAKYAWSH56YLPXLZTYPFP3PIJAKZ4PH7S235TU";

    fn payload(score: u32) -> AttestationPayload {
        AttestationPayload::build(
            PayloadVersion::V1,
            &[0u8; 40],
            1,
            score,
            &IdentityDigest::from_bytes([9; 32]),
        )
    }

    #[test]
    fn test_public_key_from_stellar_secret() {
        let signer = AttestationSigner::from_stellar_secret(SECRET).unwrap();
        assert_eq!(signer.public_key_strkey(), PUBLIC);
    }

    #[test]
    fn test_invalid_secret_is_key_error() {
        let result = AttestationSigner::from_stellar_secret(PUBLIC);
        assert!(matches!(result, Err(AttestationError::InvalidSecretKey(_))));
        let result = AttestationSigner::from_stellar_secret("not-a-key");
        assert!(matches!(result, Err(AttestationError::InvalidSecretKey(_))));
    }

    #[test]
    fn test_signature_is_deterministic_and_verifies() {
        let signer = AttestationSigner::from_seed([7; 32]);
        let first = signer.sign(&payload(950));
        let second = signer.sign(&payload(950));

        assert_eq!(first, second);
        assert_eq!(first.to_bytes().len(), SIGNATURE_LEN);
        assert!(signer.verify(&payload(950), &first));
        assert!(!signer.verify(&payload(951), &first));
    }

    #[test]
    fn test_other_key_does_not_verify() {
        let signer = AttestationSigner::from_seed([7; 32]);
        let other = AttestationSigner::from_seed([8; 32]);
        let signature = signer.sign(&payload(700));
        assert!(matches!(
            verify_with_public_key(&other.public_key(), &payload(700), &signature),
            Err(AttestationError::VerificationFailed)
        ));
    }

    #[test]
    fn test_signature_hex_roundtrip() {
        let signature = AttestationSigner::from_seed([1; 32]).sign(&payload(300));
        assert_eq!(
            AttestationSignature::from_hex(&signature.to_hex()).unwrap(),
            signature
        );
        assert!(AttestationSignature::from_hex("00ff").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_seed() {
        let signer = AttestationSigner::from_stellar_secret(SECRET).unwrap();
        let debug = format!("{:?}", signer);
        assert!(debug.contains(PUBLIC));
        assert!(!debug.contains(SECRET));
    }
}
