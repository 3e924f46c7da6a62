//! In-process reference engine

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use secp256k1::{Secp256k1, SignOnly};
use tracing::debug;

use super::{Endpoint, WalletEngine, WalletHandle};
use crate::account::{decode_payment_address, Account, AccountId, Pool, Wallet};
use crate::config::EngineConfig;
use crate::constants::Network;
use crate::crypto::seed::Seed;
use crate::error::{EngineError, Result};

/// Wallet engine that keeps every wallet in process memory
///
/// Handles are keys into an arena of wallets. Values come from a counter and
/// are never reused, so a released handle can never alias a newer wallet.
pub struct LocalEngine {
    network: Network,
    secp: Secp256k1<SignOnly>,
    wallets: Mutex<HashMap<u64, Wallet>>,
    next_handle: AtomicU64,
}

impl LocalEngine {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            secp: Secp256k1::signing_only(),
            wallets: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Build an engine and check that it can derive and encode addresses
    pub fn load(config: EngineConfig) -> Result<Self> {
        let engine = Self::new(config.network);
        engine
            .self_test()
            .map_err(|e| EngineError::EngineUnavailable(format!("self-test failed: {}", e)))?;
        Ok(engine)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Number of handles issued and not yet released
    pub fn live_handles(&self) -> usize {
        self.wallets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver a note paid to `address`
    ///
    /// Stands in for chain scanning: every account of every live wallet whose
    /// default address matches receives the note. Returns how many accounts
    /// received it. Nothing is recorded unless every recipient can accept it.
    pub fn deliver(&self, address: &str, pool: Pool, value: u64) -> Result<usize> {
        let recipient = decode_payment_address(self.network.address_hrp(), address)?;

        let mut wallets = self.wallets()?;
        let mut accounts: Vec<&mut Account> = wallets
            .values_mut()
            .flat_map(|wallet| wallet.accounts_mut())
            .filter(|account| *account.default_address() == recipient)
            .collect();

        for account in accounts.iter() {
            account.check_receive(pool, value)?;
        }
        for account in accounts.iter_mut() {
            account.receive(pool, value)?;
        }

        debug!(?pool, value, recipients = accounts.len(), "Note delivered");
        Ok(accounts.len())
    }

    fn self_test(&self) -> Result<()> {
        let endpoint: Endpoint = "127.0.0.1:0".parse()?;
        let mut wallet = Wallet::new(Seed::new([0u8; 32]), endpoint, self.network);

        let id = wallet.create_account(&self.secp, "self-test".to_string())?;
        let encoded = wallet.default_address(id)?;
        let decoded = decode_payment_address(self.network.address_hrp(), &encoded)?;

        if &decoded != wallet.account(id)?.default_address() {
            return Err(EngineError::Address(
                "address does not survive encoding".to_string(),
            ));
        }
        Ok(())
    }

    fn wallets(&self) -> Result<MutexGuard<'_, HashMap<u64, Wallet>>> {
        self.wallets
            .lock()
            .map_err(|_| EngineError::EngineUnavailable("wallet state poisoned".to_string()))
    }

    fn with_wallet<T>(
        &self,
        handle: &WalletHandle,
        f: impl FnOnce(&mut Wallet) -> Result<T>,
    ) -> Result<T> {
        let mut wallets = self.wallets()?;
        let wallet = wallets
            .get_mut(&handle.raw())
            .ok_or(EngineError::InvalidHandle(handle.raw()))?;
        f(wallet)
    }
}

impl WalletEngine for LocalEngine {
    fn acquire(&self, seed: &[u8], endpoint: &str) -> Result<WalletHandle> {
        let seed = Seed::from_slice(seed).map_err(EngineError::unavailable)?;
        let endpoint: Endpoint = endpoint.parse().map_err(EngineError::unavailable)?;

        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let handle = WalletHandle::from_raw(raw);

        let mut wallets = self.wallets()?;
        let wallet = wallets
            .entry(raw)
            .or_insert_with(|| Wallet::new(seed, endpoint, self.network));
        debug!(handle = %handle, endpoint = %wallet.endpoint(), "Wallet acquired");
        Ok(handle)
    }

    fn release(&self, handle: WalletHandle) -> Result<()> {
        self.wallets()?
            .remove(&handle.raw())
            .ok_or(EngineError::InvalidHandle(handle.raw()))?;
        debug!(handle = %handle, "Wallet released");
        Ok(())
    }

    fn create_account(&self, handle: &WalletHandle, label: &str) -> Result<AccountId> {
        let id = self.with_wallet(handle, |wallet| {
            wallet.create_account(&self.secp, label.to_string())
        })?;
        debug!(handle = %handle, account = id.0, "Account created");
        Ok(id)
    }

    fn list_accounts(&self, handle: &WalletHandle) -> Result<Vec<String>> {
        self.with_wallet(handle, |wallet| {
            Ok(wallet
                .accounts()
                .iter()
                .map(|account| account.label().to_string())
                .collect())
        })
    }

    fn default_address(&self, handle: &WalletHandle, account: AccountId) -> Result<String> {
        self.with_wallet(handle, |wallet| wallet.default_address(account))
    }

    fn balances(&self, handle: &WalletHandle, account: AccountId) -> Result<Vec<u64>> {
        self.with_wallet(handle, |wallet| wallet.account(account)?.balances())
    }
}
