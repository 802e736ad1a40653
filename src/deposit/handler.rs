// Deposit handler - credits locked balances after an external transfer
// The external move happens first; the local credit only mirrors a
// transfer that already succeeded

use crate::account::AccountId;
use crate::deposit::TokenLedger;
use crate::ledger::{LedgerError, LedgerStore};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a deposit
#[derive(Error, Debug)]
pub enum DepositError {
    #[error("Invalid amount: deposit cannot be zero")]
    InvalidAmount,

    #[error("External transfer failed: {0}")]
    ExternalTransferFailed(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Events emitted by the deposit handler
#[derive(Clone, Debug)]
pub enum DepositEvent {
    /// A deposit completed and the locked balance was credited
    Deposited {
        account: AccountId,
        amount: u64,
        tx_id: String,
    },
}

/// Statistics about deposit operations
#[derive(Clone, Debug, Default)]
pub struct DepositStats {
    pub deposits_completed: u64,
    pub deposits_failed: u64,
    pub total_deposited: u64,
}

/// Handler moving funds from the token ledger into locked balances
pub struct DepositHandler {
    /// The account holding the pooled funds on the token ledger
    vault_account: AccountId,
    /// The external token ledger
    token: Arc<dyn TokenLedger>,
    /// Events queue
    events: Vec<DepositEvent>,
    /// Statistics
    stats: DepositStats,
}

impl DepositHandler {
    /// Create a new deposit handler
    pub fn new(vault_account: AccountId, token: Arc<dyn TokenLedger>) -> Self {
        Self {
            vault_account,
            token,
            events: Vec::new(),
            stats: DepositStats::default(),
        }
    }

    /// Get the vault account on the token ledger
    pub fn vault_account(&self) -> &AccountId {
        &self.vault_account
    }

    /// Deposit `amount` from `caller` into its locked balance.
    ///
    /// The external transfer executes first; the locked balance is
    /// credited only on its success. A failed transfer changes nothing
    /// locally. This is the only path that increases a locked balance.
    pub async fn deposit(
        &mut self,
        store: &mut LedgerStore,
        caller: &AccountId,
        amount: u64,
    ) -> Result<(), DepositError> {
        match self.try_deposit(store, caller, amount).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.deposits_failed += 1;
                tracing::warn!(account = %caller, amount, error = %err, "deposit failed");
                Err(err)
            }
        }
    }

    async fn try_deposit(
        &mut self,
        store: &mut LedgerStore,
        caller: &AccountId,
        amount: u64,
    ) -> Result<(), DepositError> {
        if amount == 0 {
            return Err(DepositError::InvalidAmount);
        }

        if !store.is_initialized() {
            return Err(LedgerError::NotInitialized.into());
        }

        // The credit must be guaranteed to succeed before funds move
        store
            .locked_balance(caller)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        let tx_id = self
            .token
            .transfer(caller, &self.vault_account, amount)
            .await
            .map_err(DepositError::ExternalTransferFailed)?;

        store.credit(caller, amount)?;

        self.stats.deposits_completed += 1;
        self.stats.total_deposited = self.stats.total_deposited.saturating_add(amount);

        self.events.push(DepositEvent::Deposited {
            account: caller.clone(),
            amount,
            tx_id,
        });

        tracing::info!(account = %caller, amount, "deposit credited");

        Ok(())
    }

    /// Poll for events (clears the event queue)
    pub fn poll_events(&mut self) -> Vec<DepositEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get statistics
    pub fn stats(&self) -> &DepositStats {
        &self.stats
    }
}
