//! Canonical address encodings
//!
//! The verifier contract rebuilds the payload from its own view of the customer's
//! address, so the bytes we put first must be exactly what it derives. That
//! encoding is owned by the chain, not by us: it comes in through [`AddressCodec`].

use stellar_xdr::curr::{AccountId, Hash, Limits, PublicKey, ScAddress, Uint256, WriteXdr};

use super::strkey::{self, StrkeyKind};
use super::AddressError;

/// Produces the canonical byte form of a blockchain identity
pub trait AddressCodec: Send + Sync {
    /// Encode `address` exactly as the external verifier does
    fn encode(&self, address: &str) -> Result<Vec<u8>, AddressError>;

    /// Short name for logs and responses
    fn name(&self) -> &'static str;
}

/// Raw XDR of a Soroban `ScAddress`, as produced by `Address::to_xdr` on-chain.
///
/// Accounts (`G...`) encode to 40 bytes, contracts (`C...`) to 36.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScAddressCodec;

impl ScAddressCodec {
    /// Parse a strkey into the `ScAddress` it names
    pub fn sc_address(address: &str) -> Result<ScAddress, AddressError> {
        match StrkeyKind::from_prefix(address.trim()) {
            Some(StrkeyKind::AccountId) => {
                let key = strkey::decode(StrkeyKind::AccountId, address)?;
                Ok(ScAddress::Account(AccountId(
                    PublicKey::PublicKeyTypeEd25519(Uint256(key)),
                )))
            }
            Some(StrkeyKind::Contract) => {
                let id = strkey::decode(StrkeyKind::Contract, address)?;
                Ok(ScAddress::Contract(Hash(id)))
            }
            _ => Err(AddressError::UnsupportedAddress(
                "Expected a Stellar account (G...) or contract (C...) address".to_string(),
            )),
        }
    }
}

impl AddressCodec for ScAddressCodec {
    fn encode(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        let sc_address = Self::sc_address(address)?;
        sc_address
            .to_xdr(Limits::none())
            .map_err(|e| AddressError::Encoding(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "soroban-scaddress-xdr"
    }
}
