//! zwallet session - safe facade over a wallet engine handle
//!
//! A [`WalletSession`] owns exactly one engine handle for its lifetime. It
//! forwards account operations to the engine, and once destroyed rejects
//! every call with [`Error::SessionClosed`] instead of letting a stale handle
//! reach the engine.
//!
//! ```no_run
//! use zwallet_session::{SessionConfig, WalletSession};
//!
//! # fn main() -> zwallet_session::Result<()> {
//! let session = WalletSession::open_with_config([0u8; 32], &SessionConfig::new("127.0.0.1:0"))?;
//! session.create_account("a1")?;
//! let address = session.default_address_for_account(0)?;
//! session.destroy()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod logging;
mod session;

pub use config::SessionConfig;
pub use error::{Error, ErrorKind, Operation, Result};
pub use session::{AccountSummary, WalletSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
