//! zwallet core - wallet engine binding and reference engine
//!
//! This library defines the operation set a wallet session may invoke against
//! an opaque engine handle ([`engine::WalletEngine`]), and ships an in-process
//! engine ([`engine::LocalEngine`]) that derives one key and default payment
//! address per account from a 32-byte seed and tracks per-pool balances.

pub mod error;
pub mod constants;
pub mod config;
pub mod crypto;
pub mod account;
pub mod engine;

// Re-export commonly used types for convenience
pub use account::{AccountId, Pool};
pub use config::EngineConfig;
pub use constants::Network;
pub use crypto::seed::Seed;
pub use engine::{Endpoint, LocalEngine, WalletEngine, WalletHandle};
pub use error::{EngineError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
