//! Wallet session: the sole owner of one engine handle

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zwallet_core::engine::{self, WalletEngine, WalletHandle};
use zwallet_core::AccountId;

use crate::config::SessionConfig;
use crate::error::{engine_error, Error, Operation, Result};

/// Everything the UI layer shows for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub index: u32,
    pub label: String,
    pub address: String,
    pub balances: Vec<u64>,
}

enum SessionState {
    Active(WalletHandle),
    Destroyed,
}

/// A wallet session
///
/// Acquires a handle when opened and releases it on [`destroy`] or drop.
/// After destruction every call fails with [`Error::SessionClosed`] and never
/// reaches the engine. The liveness check and the forwarded call run under one
/// lock, so a concurrent `destroy` waits for in-flight calls.
///
/// [`destroy`]: WalletSession::destroy
pub struct WalletSession {
    engine: Arc<dyn WalletEngine>,
    state: Mutex<SessionState>,
}

impl WalletSession {
    /// Open a session for `seed` against `engine`
    pub fn open(
        engine: Arc<dyn WalletEngine>,
        seed: impl AsRef<[u8]>,
        endpoint: &str,
    ) -> Result<Self> {
        let handle = engine
            .acquire(seed.as_ref(), endpoint)
            .map_err(engine_error(Operation::Open))?;
        info!(handle = %handle, endpoint, "Wallet session opened");

        Ok(Self {
            engine,
            state: Mutex::new(SessionState::Active(handle)),
        })
    }

    /// Open a session against the process-wide reference engine, loading it
    /// first if needed
    pub fn open_with_config(seed: impl AsRef<[u8]>, config: &SessionConfig) -> Result<Self> {
        let engine = engine::load(config.engine.clone()).map_err(engine_error(Operation::Open))?;
        Self::open(engine, seed, &config.endpoint)
    }

    /// Whether the session still holds its handle
    pub fn is_active(&self) -> bool {
        matches!(*self.lock(), SessionState::Active(_))
    }

    /// Create an account labelled `label`
    pub fn create_account(&self, label: &str) -> Result<()> {
        let op = Operation::CreateAccount;
        self.with_handle(op, |engine, handle| {
            if label.is_empty() {
                return Err(Error::InvalidLabel { op });
            }
            engine
                .create_account(handle, label)
                .map(|_| ())
                .map_err(engine_error(op))
        })
    }

    /// Account labels in creation order
    pub fn accounts(&self) -> Result<Vec<String>> {
        let op = Operation::Accounts;
        self.with_handle(op, |engine, handle| {
            engine.list_accounts(handle).map_err(engine_error(op))
        })
    }

    /// Default address of the account at `index`
    pub fn default_address_for_account(&self, index: i64) -> Result<String> {
        let op = Operation::DefaultAddress;
        self.with_handle(op, |engine, handle| {
            let account = account_id(op, index)?;
            engine.default_address(handle, account).map_err(engine_error(op))
        })
    }

    /// Balances of the account at `index`, one entry per pool
    pub fn balances_for_account(&self, index: i64) -> Result<Vec<u64>> {
        let op = Operation::Balances;
        self.with_handle(op, |engine, handle| {
            let account = account_id(op, index)?;
            engine.balances(handle, account).map_err(engine_error(op))
        })
    }

    /// Label, address and balances of every account, read under one lock
    pub fn summaries(&self) -> Result<Vec<AccountSummary>> {
        let op = Operation::Summaries;
        self.with_handle(op, |engine, handle| {
            let labels = engine.list_accounts(handle).map_err(engine_error(op))?;

            (0u32..)
                .zip(labels)
                .map(|(index, label)| -> Result<AccountSummary> {
                    let account = AccountId(index);
                    Ok(AccountSummary {
                        index: account.0,
                        label,
                        address: engine.default_address(handle, account).map_err(engine_error(op))?,
                        balances: engine.balances(handle, account).map_err(engine_error(op))?,
                    })
                })
                .collect()
        })
    }

    /// Release the engine handle. The session is unusable afterwards.
    pub fn destroy(&self) -> Result<()> {
        let op = Operation::Destroy;
        let mut state = self.lock();

        match std::mem::replace(&mut *state, SessionState::Destroyed) {
            SessionState::Active(handle) => {
                info!(handle = %handle, "Destroying wallet session");
                self.engine.release(handle).map_err(engine_error(op))
            }
            SessionState::Destroyed => Err(Error::SessionClosed { op }),
        }
    }

    fn with_handle<T>(
        &self,
        op: Operation,
        f: impl FnOnce(&dyn WalletEngine, &WalletHandle) -> Result<T>,
    ) -> Result<T> {
        let state = self.lock();
        match &*state {
            SessionState::Active(handle) => f(self.engine.as_ref(), handle),
            SessionState::Destroyed => {
                debug!(%op, "Rejected call on closed session");
                Err(Error::SessionClosed { op })
            }
        }
    }

    // State changes are single assignments, so a poisoned lock still holds a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn account_id(op: Operation, index: i64) -> Result<AccountId> {
    u32::try_from(index)
        .map(AccountId)
        .map_err(|_| Error::UnknownAccount { op, index })
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let SessionState::Active(handle) = std::mem::replace(state, SessionState::Destroyed) {
            debug!(handle = %handle, "Releasing wallet handle of dropped session");
            if let Err(e) = self.engine.release(handle) {
                warn!(error = %e, "Failed to release wallet handle");
            }
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("active", &self.is_active())
            .finish()
    }
}
