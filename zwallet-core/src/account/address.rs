//! Payment address encoding

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};

use crate::crypto::keys::DIVERSIFIER_LEN;
use crate::error::{EngineError, Result};

/// Encoded length of a payment address: diversifier followed by the public key
pub const PAYMENT_ADDRESS_LEN: usize = DIVERSIFIER_LEN + 32;

/// A diversified payment address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentAddress {
    diversifier: [u8; DIVERSIFIER_LEN],
    pk_d: [u8; 32],
}

impl PaymentAddress {
    pub fn new(diversifier: [u8; DIVERSIFIER_LEN], pk_d: [u8; 32]) -> Self {
        Self { diversifier, pk_d }
    }

    pub fn diversifier(&self) -> &[u8; DIVERSIFIER_LEN] {
        &self.diversifier
    }

    pub fn pk_d(&self) -> &[u8; 32] {
        &self.pk_d
    }

    pub fn to_bytes(&self) -> [u8; PAYMENT_ADDRESS_LEN] {
        let mut bytes = [0u8; PAYMENT_ADDRESS_LEN];
        bytes[..DIVERSIFIER_LEN].copy_from_slice(&self.diversifier);
        bytes[DIVERSIFIER_LEN..].copy_from_slice(&self.pk_d);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PAYMENT_ADDRESS_LEN {
            return Err(EngineError::Address(format!(
                "Invalid payment address length: {}",
                bytes.len()
            )));
        }

        let mut diversifier = [0u8; DIVERSIFIER_LEN];
        let mut pk_d = [0u8; 32];
        diversifier.copy_from_slice(&bytes[..DIVERSIFIER_LEN]);
        pk_d.copy_from_slice(&bytes[DIVERSIFIER_LEN..]);

        Ok(Self { diversifier, pk_d })
    }
}

/// Encode a payment address as bech32 under the given prefix
pub fn encode_payment_address(hrp: &str, addr: &PaymentAddress) -> Result<String> {
    bech32::encode(hrp, addr.to_bytes().to_base32(), Variant::Bech32)
        .map_err(|e| EngineError::Address(format!("Bech32 encoding failed: {}", e)))
}

/// Decode a bech32 payment address, checking that it carries the expected prefix
pub fn decode_payment_address(hrp: &str, address: &str) -> Result<PaymentAddress> {
    let (decoded_hrp, data, variant) = bech32::decode(address)
        .map_err(|e| EngineError::Address(format!("Invalid bech32: {}", e)))?;

    if decoded_hrp != hrp {
        return Err(EngineError::Address(format!(
            "Expected prefix {}, found {}",
            hrp, decoded_hrp
        )));
    }
    if variant != Variant::Bech32 {
        return Err(EngineError::Address("Expected bech32, found bech32m".to_string()));
    }

    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| EngineError::Address(format!("Invalid address data: {}", e)))?;
    PaymentAddress::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    fn sample_address() -> PaymentAddress {
        PaymentAddress::new([0u8; DIVERSIFIER_LEN], [0x42; 32])
    }

    #[test]
    fn test_encoding_uses_network_prefix() {
        let addr = sample_address();

        let main = encode_payment_address(constants::HRP_SAPLING_PAYMENT_ADDRESS_MAIN, &addr).unwrap();
        let test = encode_payment_address(constants::HRP_SAPLING_PAYMENT_ADDRESS_TEST, &addr).unwrap();

        assert!(main.starts_with("zs1qqqqqqqqqqqqqqqq"));
        assert!(test.starts_with("ztestsapling1qqqqqqqqqqqqqqqq"));
    }

    #[test]
    fn test_decode_recovers_address() {
        let addr = sample_address();
        let encoded = encode_payment_address("zs", &addr).unwrap();

        assert_eq!(decode_payment_address("zs", &encoded).unwrap(), addr);
    }

    #[test]
    fn test_decode_rejects_wrong_prefix() {
        let encoded = encode_payment_address("zs", &sample_address()).unwrap();
        assert!(matches!(
            decode_payment_address("ztestsapling", &encoded),
            Err(EngineError::Address(_))
        ));
    }

    #[test]
    fn test_decode_rejects_corruption() {
        let mut encoded = encode_payment_address("zs", &sample_address()).unwrap();
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'q' { 'p' } else { 'q' });

        assert!(decode_payment_address("zs", &encoded).is_err());
    }
}
