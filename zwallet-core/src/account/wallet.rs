//! Engine-side wallet state

use secp256k1::{Secp256k1, Signing};
use serde::{Deserialize, Serialize};

use super::address::{encode_payment_address, PaymentAddress};
use crate::constants::{Network, MAX_MONEY};
use crate::crypto::keys::{derive_account_key, HARDENED_OFFSET};
use crate::crypto::seed::Seed;
use crate::engine::Endpoint;
use crate::error::{EngineError, Result};

/// Position of an account in its wallet's creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u32);

/// A balance bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Transparent,
    Sapling,
}

impl Pool {
    /// Order of the entries in a balance vector
    pub const ALL: [Pool; 2] = [Pool::Transparent, Pool::Sapling];
}

/// A value received by an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub pool: Pool,
    pub value: u64,
}

/// A labelled derivation context with one default address
#[derive(Debug, Clone)]
pub struct Account {
    label: String,
    address: PaymentAddress,
    notes: Vec<Note>,
}

impl Account {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_address(&self) -> &PaymentAddress {
        &self.address
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// One total per pool, in `Pool::ALL` order
    pub fn balances(&self) -> Result<Vec<u64>> {
        Pool::ALL
            .iter()
            .map(|pool| {
                self.notes
                    .iter()
                    .filter(|note| note.pool == *pool)
                    .try_fold(0u64, |total, note| total.checked_add(note.value))
                    .ok_or_else(|| {
                        EngineError::AmountOutOfRange(format!("{:?} balance overflows", pool))
                    })
            })
            .collect()
    }

    /// Check that a note could be recorded without leaving the money range
    pub fn check_receive(&self, pool: Pool, value: u64) -> Result<()> {
        if value > MAX_MONEY {
            return Err(EngineError::AmountOutOfRange(format!(
                "Note value {} exceeds the money supply",
                value
            )));
        }

        let current = self
            .notes
            .iter()
            .filter(|note| note.pool == pool)
            .map(|note| note.value)
            .sum::<u64>();
        if current + value > MAX_MONEY {
            return Err(EngineError::AmountOutOfRange(format!(
                "{:?} balance would exceed the money supply",
                pool
            )));
        }
        Ok(())
    }

    /// Record an incoming note
    pub fn receive(&mut self, pool: Pool, value: u64) -> Result<()> {
        self.check_receive(pool, value)?;
        self.notes.push(Note { pool, value });
        Ok(())
    }
}

/// Wallet state behind one engine handle
pub struct Wallet {
    network: Network,
    seed: Seed,
    endpoint: Endpoint,
    accounts: Vec<Account>,
}

impl Wallet {
    pub fn new(seed: Seed, endpoint: Endpoint, network: Network) -> Self {
        Self {
            network,
            seed,
            endpoint,
            accounts: Vec::new(),
        }
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Create a new account. Accounts are derived in creation order.
    pub fn create_account<C: Signing>(
        &mut self,
        secp: &Secp256k1<C>,
        label: String,
    ) -> Result<AccountId> {
        let index = u32::try_from(self.accounts.len())
            .ok()
            .filter(|index| *index < HARDENED_OFFSET)
            .ok_or_else(|| {
                EngineError::AccountCreationFailed("account index space exhausted".to_string())
            })?;

        let address = derive_account_key(&self.seed, self.network.coin_type(), index)
            .and_then(|key| key.default_address(secp))
            .map_err(|e| EngineError::AccountCreationFailed(e.to_string()))?;

        self.accounts.push(Account {
            label,
            address,
            notes: Vec::new(),
        });

        Ok(AccountId(index))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut [Account] {
        &mut self.accounts
    }

    pub fn account(&self, id: AccountId) -> Result<&Account> {
        let count = self.accounts.len();
        self.accounts
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownAccount { index: id.0, count })
    }

    /// The encoded default address of an account
    pub fn default_address(&self, id: AccountId) -> Result<String> {
        let account = self.account(id)?;
        encode_payment_address(self.network.address_hrp(), account.default_address())
    }
}
