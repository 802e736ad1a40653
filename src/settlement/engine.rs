// Settlement engine - proves and applies batches of balance updates
// The only component that advances the commitment root

use crate::account::AccountId;
use crate::ledger::{LedgerError, LedgerStore};
use crate::merkle::{leaf_digest, verify_multiproof, Digest};
use crate::settlement::{BalanceUpdate, SettlementBatch};
use thiserror::Error;

// ============================================================================
// SETTLEMENT ERROR
// ============================================================================

/// Errors that can reject a settlement call
#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Stale or mismatched pre-root: current {current}, claimed {claimed}")]
    StaleOrMismatchedRoot { current: Digest, claimed: Digest },

    #[error("Multiproof does not reconstruct the claimed post-root")]
    InvalidProof,

    #[error("Balance increase rejected for {account}: locked {current}, proposed {proposed}")]
    BalanceIncreaseRejected {
        account: AccountId,
        current: u64,
        proposed: u64,
    },

    #[error("Malformed batch: {0}")]
    MalformedBatch(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ============================================================================
// SETTLEMENT EVENTS
// ============================================================================

/// Events emitted by the settlement engine
#[derive(Clone, Debug)]
pub enum SettlementEvent {
    /// A batch was proven and applied
    Settled {
        root_before: Digest,
        root_after: Digest,
        fee_delta: u64,
        accounts: Vec<AccountId>,
    },
    /// A batch was rejected; no state changed
    Rejected { reason: String },
}

// ============================================================================
// SETTLEMENT STATS
// ============================================================================

/// Statistics about settlement operations
#[derive(Clone, Debug, Default)]
pub struct SettlementStats {
    pub batches_settled: u64,
    pub batches_rejected: u64,
    pub accounts_updated: u64,
    pub fees_collected: u64,
}

// ============================================================================
// SETTLEMENT ENGINE
// ============================================================================

/// Engine for verifying and applying settlement batches.
///
/// A batch is applied all-or-nothing: every check runs against the
/// pre-state, and the ledger is touched only after the whole batch is
/// proven. A rejected batch leaves the store bit-identical.
pub struct SettlementEngine {
    /// Events queue
    events: Vec<SettlementEvent>,
    /// Statistics
    stats: SettlementStats,
}

impl SettlementEngine {
    /// Create a new settlement engine
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            stats: SettlementStats::default(),
        }
    }

    /// Prove a batch against the store and apply it.
    ///
    /// Advances the current root to the batch's claimed post-root.
    /// After the first successful application a resubmitted batch fails
    /// the pre-root check, so replays reject themselves.
    pub fn settle(
        &mut self,
        store: &mut LedgerStore,
        batch: &SettlementBatch,
    ) -> Result<(), SettlementError> {
        match self.try_settle(store, batch) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.batches_rejected += 1;
                self.events.push(SettlementEvent::Rejected {
                    reason: err.to_string(),
                });
                tracing::warn!(error = %err, "settlement rejected");
                Err(err)
            }
        }
    }

    fn try_settle(
        &mut self,
        store: &mut LedgerStore,
        batch: &SettlementBatch,
    ) -> Result<(), SettlementError> {
        if !store.is_initialized() {
            return Err(LedgerError::NotInitialized.into());
        }

        let root_before = store.current_root();
        Self::check_pre_root(store, batch)?;
        Self::check_shape(batch)?;

        // Monotonicity and leaf computation, all against the pre-state
        let leaves = Self::preview_leaves(store, batch.updates())?;

        if !verify_multiproof(batch.proof(), batch.flags(), batch.post_root(), &leaves) {
            return Err(SettlementError::InvalidProof);
        }

        // Everything is proven; mutate in one pass
        let updates: Vec<(AccountId, u64)> = batch
            .updates()
            .iter()
            .map(|u| (u.account().clone(), u.balance()))
            .collect();
        let fee_delta = store.apply_settlement(&updates, batch.post_root());

        self.stats.batches_settled += 1;
        self.stats.accounts_updated += updates.len() as u64;
        self.stats.fees_collected = self.stats.fees_collected.saturating_add(fee_delta);

        self.events.push(SettlementEvent::Settled {
            root_before,
            root_after: batch.post_root(),
            fee_delta,
            accounts: batch.accounts(),
        });

        tracing::info!(
            checkpoint = store.checkpoint(),
            accounts = updates.len(),
            fee_delta,
            "settlement committed"
        );

        Ok(())
    }

    /// Validate a batch against the store without mutating anything.
    ///
    /// Runs the pre-root, shape, and proof checks, but not the
    /// monotonicity precondition; callers use this to vet a batch
    /// before submitting it for real settlement.
    pub fn verify_states(
        &self,
        store: &LedgerStore,
        batch: &SettlementBatch,
    ) -> Result<(), SettlementError> {
        if !store.is_initialized() {
            return Err(LedgerError::NotInitialized.into());
        }

        Self::check_pre_root(store, batch)?;
        Self::check_shape(batch)?;

        let leaves: Vec<Digest> = batch
            .updates()
            .iter()
            .map(|u| leaf_digest(u.account(), u.balance()))
            .collect();

        if !verify_multiproof(batch.proof(), batch.flags(), batch.post_root(), &leaves) {
            return Err(SettlementError::InvalidProof);
        }

        Ok(())
    }

    /// Compute the leaf digests for a batch, in update order, enforcing
    /// that no balance increases relative to its current locked value.
    fn preview_leaves(
        store: &LedgerStore,
        updates: &[BalanceUpdate],
    ) -> Result<Vec<Digest>, SettlementError> {
        let mut leaves = Vec::with_capacity(updates.len());

        for update in updates {
            let current = store.locked_balance(update.account());
            if update.balance() > current {
                return Err(SettlementError::BalanceIncreaseRejected {
                    account: update.account().clone(),
                    current,
                    proposed: update.balance(),
                });
            }
            leaves.push(leaf_digest(update.account(), update.balance()));
        }

        Ok(leaves)
    }

    fn check_pre_root(store: &LedgerStore, batch: &SettlementBatch) -> Result<(), SettlementError> {
        let current = store.current_root();
        if batch.pre_root() != current {
            return Err(SettlementError::StaleOrMismatchedRoot {
                current,
                claimed: batch.pre_root(),
            });
        }
        Ok(())
    }

    // Rejects inconsistent counts before any hashing work happens
    fn check_shape(batch: &SettlementBatch) -> Result<(), SettlementError> {
        if batch.updates().is_empty() {
            return Err(SettlementError::MalformedBatch(
                "batch contains no balance updates".to_string(),
            ));
        }

        if batch.updates().len() + batch.proof().len() != batch.flags().len() + 1 {
            return Err(SettlementError::MalformedBatch(format!(
                "{} updates + {} proof nodes inconsistent with {} flags",
                batch.updates().len(),
                batch.proof().len(),
                batch.flags().len()
            )));
        }

        Ok(())
    }

    /// Poll for events (clears the event queue)
    pub fn poll_events(&mut self) -> Vec<SettlementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get statistics
    pub fn stats(&self) -> &SettlementStats {
        &self.stats
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}
