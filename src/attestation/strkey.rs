//! Stellar strkey encoding
//!
//! Stellar keys travel as base32 strings: one version byte, the 32-byte key and a
//! CRC16-XModem checksum (little-endian).

use base32::Alphabet;

use super::AddressError;

const ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Version byte + key + checksum
const DECODED_LEN: usize = 35;

/// Kinds of strkeys this service handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrkeyKind {
    /// `G...` ed25519 account public key
    AccountId,
    /// `S...` ed25519 secret seed
    SecretSeed,
    /// `C...` Soroban contract id
    Contract,
}

impl StrkeyKind {
    fn version_byte(&self) -> u8 {
        match self {
            StrkeyKind::AccountId => 6 << 3,
            StrkeyKind::SecretSeed => 18 << 3,
            StrkeyKind::Contract => 2 << 3,
        }
    }

    fn prefix(&self) -> char {
        match self {
            StrkeyKind::AccountId => 'G',
            StrkeyKind::SecretSeed => 'S',
            StrkeyKind::Contract => 'C',
        }
    }

    /// Kind named by the leading character, if supported
    pub fn from_prefix(value: &str) -> Option<Self> {
        match value.chars().next()? {
            'G' => Some(StrkeyKind::AccountId),
            'S' => Some(StrkeyKind::SecretSeed),
            'C' => Some(StrkeyKind::Contract),
            _ => None,
        }
    }
}

/// Decode a strkey of the expected kind into its 32-byte payload
pub fn decode(kind: StrkeyKind, value: &str) -> Result<[u8; 32], AddressError> {
    let value = value.trim();

    if !value.starts_with(kind.prefix()) {
        return Err(AddressError::InvalidFormat(format!(
            "Expected a key starting with '{}'",
            kind.prefix()
        )));
    }

    let decoded = base32::decode(ALPHABET, value)
        .ok_or_else(|| AddressError::InvalidFormat("Invalid base32 encoding".to_string()))?;

    if decoded.len() != DECODED_LEN {
        return Err(AddressError::InvalidFormat(format!(
            "Expected {} bytes, got {}",
            DECODED_LEN,
            decoded.len()
        )));
    }

    if decoded[0] != kind.version_byte() {
        return Err(AddressError::InvalidFormat("Unexpected version byte".to_string()));
    }

    let (payload, checksum) = decoded.split_at(33);
    if checksum != crc16_xmodem(payload) {
        return Err(AddressError::InvalidChecksum);
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[1..]);
    Ok(key)
}

/// Encode a 32-byte payload as a strkey of the given kind
pub fn encode(kind: StrkeyKind, key: &[u8; 32]) -> String {
    let mut data = Vec::with_capacity(DECODED_LEN);
    data.push(kind.version_byte());
    data.extend_from_slice(key);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum);

    base32::encode(ALPHABET, &data)
}

/// CRC16-XModem checksum, little-endian
fn crc16_xmodem(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;

    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }

    crc.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "GCCQBYTIDSGV4QH624WGSHTFUEOGE53N3NCGL6U4HX4SACYY2YA2POQM";

    #[test]
    fn test_decode_account_id() {
        let key = decode(StrkeyKind::AccountId, ACCOUNT).unwrap();
        assert_eq!(
            hex::encode(key),
            "8500e2681c8d5e40fed72c691e65a11c62776ddb4465fa9c3df9200b18d601a7"
        );
    }

    #[test]
    fn test_encode_matches_decode() {
        let key = decode(StrkeyKind::AccountId, ACCOUNT).unwrap();
        assert_eq!(encode(StrkeyKind::AccountId, &key), ACCOUNT);
    }

    #[test]
    fn test_wrong_prefix() {
        let result = decode(StrkeyKind::SecretSeed, ACCOUNT);
        assert!(matches!(result, Err(AddressError::InvalidFormat(_))));
    }

    #[test]
    fn test_bad_checksum() {
        // Last character altered
        let tampered = format!("{}A", &ACCOUNT[..ACCOUNT.len() - 1]);
        let result = decode(StrkeyKind::AccountId, &tampered);
        assert!(matches!(result, Err(AddressError::InvalidChecksum)));
    }

    #[test]
    fn test_truncated_key() {
        let result = decode(StrkeyKind::AccountId, &ACCOUNT[..40]);
        assert!(matches!(result, Err(AddressError::InvalidFormat(_))));
    }

    #[test]
    fn test_from_prefix() {
        assert_eq!(StrkeyKind::from_prefix(ACCOUNT), Some(StrkeyKind::AccountId));
        assert_eq!(StrkeyKind::from_prefix("CAAA"), Some(StrkeyKind::Contract));
        assert_eq!(StrkeyKind::from_prefix("MAAA"), None);
        assert_eq!(StrkeyKind::from_prefix(""), None);
    }
}
