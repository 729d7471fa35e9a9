//! Customer identity handling
//!
//! RUT validation for the boundary and the keyed identity digest that stands in
//! for the identifier everywhere past it.

mod digest;
pub mod rut;

use thiserror::Error;

pub use digest::{clean_identifier, IdentityDigest, IdentityHasher, IDENTITY_DIGEST_LEN};

/// Errors raised while deriving or parsing identity digests
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity hash secret is empty")]
    EmptySecret,

    #[error("Invalid identity hash secret: {0}")]
    InvalidSecret(String),

    #[error("Identifier is empty after normalization")]
    EmptyIdentifier,

    #[error("Invalid identity digest: {0}")]
    InvalidDigest(String),
}

impl IdentityError {
    /// Whether the failure comes from key material rather than caller input
    pub fn is_key_material(&self) -> bool {
        matches!(self, IdentityError::EmptySecret | IdentityError::InvalidSecret(_))
    }
}
