//! Session configuration

use serde::{Deserialize, Serialize};
use zwallet_core::{EngineConfig, Network};

use crate::error::{engine_error, Operation, Result};

/// Environment variable holding the backing service endpoint
pub const ENDPOINT_ENV: &str = "ZWALLET_ENDPOINT";

/// Endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:18232";

/// Configuration for opening a session against the process-wide engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// `host:port` of the service the engine uses
    pub endpoint: String,
    /// Configuration for loading the engine
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.engine.network = network;
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let endpoint =
            std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let engine = EngineConfig::from_env().map_err(engine_error(Operation::Open))?;

        Ok(Self { endpoint, engine })
    }
}
