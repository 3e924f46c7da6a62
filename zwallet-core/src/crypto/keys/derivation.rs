//! Hardened account key derivation
//!
//! Keys follow the ZIP-32 path layout `m/32'/coin_type'/account'`. The master
//! key is HMAC-SHA512 of the seed under the `ZcashIP32Sapling` domain, and each
//! child step is a BIP-32 style hardened derivation over secp256k1.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};
use sha2::{Digest, Sha256, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::account::PaymentAddress;
use crate::constants::ZIP32_PURPOSE;
use crate::crypto::seed::Seed;
use crate::error::{EngineError, Result};

/// Domain separator for the master key
const MASTER_KEY_DOMAIN: &[u8] = b"ZcashIP32Sapling";

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Length of an address diversifier
pub const DIVERSIFIER_LEN: usize = 11;

/// The spending key and chain code of one account
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccountKey {
    secret_key: [u8; 32],
    chain_code: [u8; 32],
}

impl AccountKey {
    /// The account's default payment address
    pub fn default_address<C: Signing>(&self, secp: &Secp256k1<C>) -> Result<PaymentAddress> {
        let secret_key = SecretKey::from_slice(&self.secret_key)
            .map_err(|e| EngineError::KeyDerivation(format!("Invalid account key: {}", e)))?;
        let (pk_d, _parity) = PublicKey::from_secret_key(secp, &secret_key).x_only_public_key();

        let digest = Sha256::digest(self.chain_code);
        let mut diversifier = [0u8; DIVERSIFIER_LEN];
        diversifier.copy_from_slice(&digest[..DIVERSIFIER_LEN]);

        Ok(PaymentAddress::new(diversifier, pk_d.serialize()))
    }
}

/// Derive the key for `account` under `coin_type` from a wallet seed
pub fn derive_account_key(seed: &Seed, coin_type: u32, account: u32) -> Result<AccountKey> {
    let path = [ZIP32_PURPOSE, coin_type, account];

    let (mut secret_key, mut chain_code) = derive_master_key(seed)?;
    for index in path {
        let hardened = harden(index)?;
        let (child_key, child_chain_code) = derive_hardened_child(&secret_key, &chain_code, hardened)?;
        secret_key.zeroize();
        secret_key = child_key;
        chain_code = child_chain_code;
    }

    let key = AccountKey {
        secret_key,
        chain_code,
    };
    secret_key.zeroize();
    chain_code.zeroize();

    Ok(key)
}

fn harden(index: u32) -> Result<u32> {
    if index >= HARDENED_OFFSET {
        return Err(EngineError::KeyDerivation(format!(
            "Index {} is outside the hardened range",
            index
        )));
    }
    Ok(HARDENED_OFFSET + index)
}

fn derive_master_key(seed: &Seed) -> Result<([u8; 32], [u8; 32])> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(MASTER_KEY_DOMAIN)
        .map_err(|_| EngineError::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(seed.as_bytes());
    let result = hmac.finalize().into_bytes();

    let mut secret_key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    secret_key.copy_from_slice(&result[0..32]);
    chain_code.copy_from_slice(&result[32..64]);

    // Reject the (negligible) case of an invalid scalar up front
    SecretKey::from_slice(&secret_key)
        .map_err(|e| EngineError::KeyDerivation(format!("Invalid master key: {}", e)))?;

    Ok((secret_key, chain_code))
}

fn derive_hardened_child(
    parent_key: &[u8; 32],
    parent_chain_code: &[u8; 32],
    index: u32,
) -> Result<([u8; 32], [u8; 32])> {
    let parent_secret_key = SecretKey::from_slice(parent_key)
        .map_err(|e| EngineError::KeyDerivation(format!("Invalid parent key: {}", e)))?;

    let mut data = Vec::with_capacity(37);
    data.push(0);
    data.extend_from_slice(parent_key);
    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(parent_chain_code)
        .map_err(|_| EngineError::KeyDerivation("HMAC error".to_string()))?;
    hmac.update(&data);
    data.zeroize();
    let result = hmac.finalize().into_bytes();

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(&result[32..64]);

    // child = IL + parent (mod n)
    let child_secret_key = SecretKey::from_slice(&result[0..32])
        .map_err(|e| EngineError::KeyDerivation(format!("Invalid child key: {}", e)))?
        .add_tweak(&parent_secret_key.into())
        .map_err(|e| EngineError::KeyDerivation(format!("Key addition error: {}", e)))?;

    Ok((child_secret_key.secret_bytes(), child_chain_code))
}
