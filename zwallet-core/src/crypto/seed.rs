//! Wallet seed handling

use std::fmt;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{EngineError, Result};

/// Seed length in bytes
pub const SEED_LEN: usize = 32;

/// Number of words in the backup phrase of a 256-bit seed
pub const MNEMONIC_WORDS: usize = 24;

/// A 32-byte wallet seed. Wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a seed out of a byte slice, checking its length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SEED_LEN] = bytes.try_into().map_err(|_| {
            EngineError::InvalidSeed(format!(
                "expected {} bytes, got {}",
                SEED_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s.trim())
            .map_err(|e| EngineError::InvalidSeed(format!("invalid hex: {}", e)))?;
        let seed = Self::from_slice(&bytes);
        bytes.zeroize();
        seed
    }

    /// Generate a fresh random seed
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Recover a seed from its 24-word backup phrase
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_normalized(phrase)
            .map_err(|e| EngineError::InvalidSeed(e.to_string()))?;

        if mnemonic.word_count() != MNEMONIC_WORDS {
            return Err(EngineError::InvalidSeed(format!(
                "expected a {}-word phrase, got {} words",
                MNEMONIC_WORDS,
                mnemonic.word_count()
            )));
        }

        let mut entropy = mnemonic.to_entropy();
        let seed = Self::from_slice(&entropy);
        entropy.zeroize();
        seed
    }

    /// The 24-word backup phrase encoding this seed
    pub fn to_mnemonic(&self) -> Result<String> {
        let mnemonic = Mnemonic::from_entropy(&self.0)
            .map_err(|e| EngineError::InvalidSeed(e.to_string()))?;
        Ok(mnemonic.to_string())
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}
