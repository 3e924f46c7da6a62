//! Wallet engine binding
//!
//! [`WalletEngine`] is the complete operation set a caller may invoke against
//! a [`WalletHandle`]. Engines do not track who owns a handle; they only
//! refuse handles they never issued or already released. Keeping a released
//! handle out of these calls is the caller's job, which is why
//! [`WalletHandle`] is neither `Clone` nor `Copy` and [`WalletEngine::release`]
//! takes it by value.

mod endpoint;
mod local;

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{info, warn};

pub use endpoint::Endpoint;
pub use local::LocalEngine;

use crate::account::AccountId;
use crate::config::EngineConfig;
use crate::error::Result;

/// Opaque reference to engine-side wallet state
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct WalletHandle(u64);

impl WalletHandle {
    /// Wrap a raw handle value. Only engines should mint handles.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Operations callable against a wallet handle
pub trait WalletEngine: Send + Sync {
    /// Create wallet state for `seed` backed by `endpoint`. Every call yields a
    /// fresh handle.
    fn acquire(&self, seed: &[u8], endpoint: &str) -> Result<WalletHandle>;

    /// Destroy the wallet state behind `handle`
    fn release(&self, handle: WalletHandle) -> Result<()>;

    /// Append an account to the wallet
    fn create_account(&self, handle: &WalletHandle, label: &str) -> Result<AccountId>;

    /// Account labels in creation order
    fn list_accounts(&self, handle: &WalletHandle) -> Result<Vec<String>>;

    /// Encoded default address of an account
    fn default_address(&self, handle: &WalletHandle, account: AccountId) -> Result<String>;

    /// Balance of an account, one entry per pool
    fn balances(&self, handle: &WalletHandle, account: AccountId) -> Result<Vec<u64>>;
}

static ENGINE: OnceLock<Arc<LocalEngine>> = OnceLock::new();
static LOAD_LOCK: Mutex<()> = Mutex::new(());

/// Load the process-wide reference engine
///
/// The first successful call initializes the engine; later calls return the
/// same instance and ignore `config`. A failed load caches nothing, so it can
/// be retried with a corrected configuration.
pub fn load(config: EngineConfig) -> Result<Arc<LocalEngine>> {
    load_checked(config, |_| Ok(()))
}

/// Like [`load`], but runs `check` against a freshly built engine before it
/// becomes the process-wide instance
///
/// Callers use this for known-answer checks, e.g. that the zero seed derives
/// an address they expect. A failing check is reported as
/// `EngineUnavailable` and leaves nothing cached. `check` is not run when an
/// engine is already loaded.
pub fn load_checked<F>(config: EngineConfig, check: F) -> Result<Arc<LocalEngine>>
where
    F: FnOnce(&LocalEngine) -> Result<()>,
{
    if let Some(engine) = ENGINE.get() {
        return Ok(engine.clone());
    }

    let _guard = LOAD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(engine) = ENGINE.get() {
        return Ok(engine.clone());
    }

    let engine = match LocalEngine::load(config).and_then(|engine| check(&engine).map(|_| engine)) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            let e = e.unavailable();
            warn!(error = %e, "Wallet engine failed to load");
            return Err(e);
        }
    };
    info!(network = %engine.network(), "Wallet engine loaded");

    Ok(ENGINE.get_or_init(|| engine).clone())
}
