//! Error types for the engine binding

use thiserror::Error;

/// Errors reported by a wallet engine and its building blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be loaded, initialized, or handed usable inputs
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The handle was never issued by this engine or was already released
    #[error("Invalid wallet handle: {0:#018x}")]
    InvalidHandle(u64),

    #[error("Account creation failed: {0}")]
    AccountCreationFailed(String),

    #[error("Unknown account {index} (wallet has {count} accounts)")]
    UnknownAccount { index: u32, count: usize },

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Address error: {0}")]
    Address(String),
}

impl EngineError {
    /// Rewrap input errors raised while acquiring a handle
    pub(crate) fn unavailable(self) -> Self {
        match self {
            EngineError::EngineUnavailable(_) => self,
            other => EngineError::EngineUnavailable(other.to_string()),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
