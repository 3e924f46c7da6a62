//! Network parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

// As registered in SLIP-0044
pub const COIN_TYPE_MAIN: u32 = 133;
pub const COIN_TYPE_TEST: u32 = 1;

pub const HRP_SAPLING_PAYMENT_ADDRESS_MAIN: &str = "zs";
pub const HRP_SAPLING_PAYMENT_ADDRESS_TEST: &str = "ztestsapling";

/// ZIP-32 purpose for shielded account keys
pub const ZIP32_PURPOSE: u32 = 32;

/// Total money supply in zatoshi; no single note may exceed it
pub const MAX_MONEY: u64 = 21_000_000 * 100_000_000;

/// The network a wallet engine derives keys and addresses for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    #[default]
    Test,
}

impl Network {
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Main => COIN_TYPE_MAIN,
            Network::Test => COIN_TYPE_TEST,
        }
    }

    /// Human-readable prefix for payment addresses
    pub fn address_hrp(&self) -> &'static str {
        match self {
            Network::Main => HRP_SAPLING_PAYMENT_ADDRESS_MAIN,
            Network::Test => HRP_SAPLING_PAYMENT_ADDRESS_TEST,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Main => f.write_str("main"),
            Network::Test => f.write_str("test"),
        }
    }
}

impl FromStr for Network {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            other => Err(EngineError::EngineUnavailable(format!(
                "Unknown network: {}",
                other
            ))),
        }
    }
}
