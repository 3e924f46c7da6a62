//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::constants::Network;
use crate::error::Result;

/// Environment variable selecting the network
pub const NETWORK_ENV: &str = "ZWALLET_NETWORK";

/// Configuration for loading a wallet engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Network that keys and addresses are derived for
    pub network: Network,
}

impl EngineConfig {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    /// Create configuration from environment variables
    ///
    /// An unset `ZWALLET_NETWORK` falls back to the test network; an
    /// unrecognised value is an error so a typo never silently selects the
    /// wrong coin type.
    pub fn from_env() -> Result<Self> {
        let network = match std::env::var(NETWORK_ENV) {
            Ok(value) => value.parse()?,
            Err(_) => Network::default(),
        };

        Ok(Self { network })
    }
}
