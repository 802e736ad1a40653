// LedgerStore - the only mutable state of the verifier
//
// Holds the locked-balance map, the current commitment root, and the
// running fee accumulator. Mutated only by the deposit handler
// (credit) and the settlement engine (apply_settlement); everything
// else is a pure read.

use crate::account::AccountId;
use crate::merkle::Digest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur on ledger store operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger already initialized")]
    AlreadyInitialized,

    #[error("Ledger not initialized")]
    NotInitialized,

    #[error("Balance would overflow")]
    BalanceOverflow,

    #[error("Deserialization failed")]
    DeserializationFailed,
}

/// Full ledger state for export/import and snapshot comparison
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    balances: HashMap<AccountId, u64>,
    current_root: Digest,
    total_fee: u64,
    checkpoint: u64,
    initialized: bool,
}

/// The ledger of locked balances behind the commitment root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerStore {
    /// Locked balance per account; absent means zero, entries are never removed
    balances: HashMap<AccountId, u64>,
    /// The single current commitment root
    current_root: Digest,
    /// Sum of every balance decrease ever settled
    total_fee: u64,
    /// Number of settlements applied (logical clock)
    checkpoint: u64,
    /// One-time initialization guard
    initialized: bool,
}

impl LedgerStore {
    /// Create a new, uninitialized ledger store
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            current_root: Digest::zero(),
            total_fee: 0,
            checkpoint: 0,
            initialized: false,
        }
    }

    /// Set the genesis root. May run exactly once per instance.
    pub fn initialize(&mut self, genesis_root: Digest) -> Result<(), LedgerError> {
        if self.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }

        self.current_root = genesis_root;
        self.initialized = true;
        Ok(())
    }

    /// Check whether the store has been initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Get the locked balance for an account (zero if never seen)
    pub fn locked_balance(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Get the current commitment root
    pub fn current_root(&self) -> Digest {
        self.current_root
    }

    /// Get the cumulative fee withdrawn from balances
    pub fn total_fee(&self) -> u64 {
        self.total_fee
    }

    /// Get the number of settlements applied so far
    pub fn checkpoint(&self) -> u64 {
        self.checkpoint
    }

    /// Get the number of accounts ever deposited or settled
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }

    /// Get all (account, balance) entries
    pub fn entries(&self) -> Vec<(AccountId, u64)> {
        self.balances
            .iter()
            .map(|(account, balance)| (account.clone(), *balance))
            .collect()
    }

    // ========================================================================
    // MUTATIONS (deposit handler and settlement engine only)
    // ========================================================================

    /// Increase an account's locked balance. Returns the new balance.
    pub(crate) fn credit(
        &mut self,
        account: &AccountId,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        if !self.initialized {
            return Err(LedgerError::NotInitialized);
        }

        let current = self.locked_balance(account);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.balances.insert(account.clone(), updated);
        Ok(updated)
    }

    /// Apply a fully validated settlement: write the new balances,
    /// credit the decreases to the fee accumulator, and advance the
    /// root to the claimed post-root. Returns the fee delta.
    ///
    /// Callers must have already proven the updates and checked that no
    /// balance increases.
    pub(crate) fn apply_settlement(
        &mut self,
        updates: &[(AccountId, u64)],
        post_root: Digest,
    ) -> u64 {
        let mut fee_delta = 0u64;

        for (account, balance) in updates {
            let current = self.locked_balance(account);
            fee_delta = fee_delta.saturating_add(current.saturating_sub(*balance));
            self.balances.insert(account.clone(), *balance);
        }

        self.total_fee = self.total_fee.saturating_add(fee_delta);
        self.current_root = post_root;
        self.checkpoint += 1;
        fee_delta
    }

    // ========================================================================
    // STATE EXPORT/IMPORT
    // ========================================================================

    /// Export the full ledger state
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.balances.clone(),
            current_root: self.current_root,
            total_fee: self.total_fee,
            checkpoint: self.checkpoint,
            initialized: self.initialized,
        }
    }

    /// Restore the full ledger state from a snapshot
    pub fn restore(snapshot: LedgerSnapshot) -> Self {
        Self {
            balances: snapshot.balances,
            current_root: snapshot.current_root,
            total_fee: snapshot.total_fee,
            checkpoint: snapshot.checkpoint,
            initialized: snapshot.initialized,
        }
    }

    /// Rebuild a store from its persisted parts
    pub(crate) fn from_parts(
        balances: HashMap<AccountId, u64>,
        current_root: Digest,
        total_fee: u64,
        checkpoint: u64,
    ) -> Self {
        Self {
            balances,
            current_root,
            total_fee,
            checkpoint,
            initialized: true,
        }
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        postcard::from_bytes(bytes).map_err(|_| LedgerError::DeserializationFailed)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
