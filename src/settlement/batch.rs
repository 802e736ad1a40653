// Settlement batch - one claimed state transition
// An ordered set of balance updates plus the multiproof tying them to
// the claimed post-root

use crate::account::AccountId;
use crate::merkle::Digest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a settlement batch
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Missing pre-root: the checkpoint being settled from is required")]
    MissingPreRoot,

    #[error("Missing post-root: the checkpoint being settled to is required")]
    MissingPostRoot,

    #[error("Empty batch: at least one balance update is required")]
    EmptyUpdates,

    #[error("Inconsistent proof shape: {updates} updates + {proof} proof nodes must equal {flags} flags + 1")]
    ShapeMismatch {
        updates: usize,
        proof: usize,
        flags: usize,
    },
}

/// A single proposed (account, balance) entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    account: AccountId,
    balance: u64,
}

impl BalanceUpdate {
    /// Create a new balance update
    pub fn new(account: AccountId, balance: u64) -> Self {
        Self { account, balance }
    }

    /// Get the account
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Get the proposed balance
    pub fn balance(&self) -> u64 {
        self.balance
    }
}

/// A claimed batch of balance updates with its multiproof.
///
/// Batches are ephemeral: they live for the duration of one settlement
/// call and nothing about a rejected batch persists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementBatch {
    pre_root: Digest,
    post_root: Digest,
    updates: Vec<BalanceUpdate>,
    proof: Vec<Digest>,
    flags: Vec<bool>,
}

impl SettlementBatch {
    /// Assemble a batch from raw parts, without validation.
    ///
    /// The settlement engine re-checks the shape; use
    /// [`SettlementBatchBuilder`] to validate up front.
    pub fn from_parts(
        pre_root: Digest,
        post_root: Digest,
        updates: Vec<BalanceUpdate>,
        proof: Vec<Digest>,
        flags: Vec<bool>,
    ) -> Self {
        Self {
            pre_root,
            post_root,
            updates,
            proof,
            flags,
        }
    }

    /// Get the claimed prior root
    pub fn pre_root(&self) -> Digest {
        self.pre_root
    }

    /// Get the claimed new root
    pub fn post_root(&self) -> Digest {
        self.post_root
    }

    /// Get the ordered balance updates
    pub fn updates(&self) -> &[BalanceUpdate] {
        &self.updates
    }

    /// Get the sibling proof digests
    pub fn proof(&self) -> &[Digest] {
        &self.proof
    }

    /// Get the per-step combine flags
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Get the accounts touched by this batch, in update order
    pub fn accounts(&self) -> Vec<AccountId> {
        self.updates.iter().map(|u| u.account().clone()).collect()
    }
}

/// Builder for settlement batches
pub struct SettlementBatchBuilder {
    pre_root: Option<Digest>,
    post_root: Option<Digest>,
    updates: Vec<BalanceUpdate>,
    proof: Vec<Digest>,
    flags: Vec<bool>,
}

impl SettlementBatchBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            pre_root: None,
            post_root: None,
            updates: Vec::new(),
            proof: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Set the claimed prior root (required)
    pub fn pre_root(mut self, root: Digest) -> Self {
        self.pre_root = Some(root);
        self
    }

    /// Set the claimed new root (required)
    pub fn post_root(mut self, root: Digest) -> Self {
        self.post_root = Some(root);
        self
    }

    /// Append one balance update
    pub fn update(mut self, account: AccountId, balance: u64) -> Self {
        self.updates.push(BalanceUpdate::new(account, balance));
        self
    }

    /// Set the sibling proof digests
    pub fn proof(mut self, proof: Vec<Digest>) -> Self {
        self.proof = proof;
        self
    }

    /// Set the per-step combine flags
    pub fn flags(mut self, flags: Vec<bool>) -> Self {
        self.flags = flags;
        self
    }

    /// Validate and build the batch
    pub fn build(self) -> Result<SettlementBatch, BatchError> {
        let pre_root = self.pre_root.ok_or(BatchError::MissingPreRoot)?;
        let post_root = self.post_root.ok_or(BatchError::MissingPostRoot)?;

        if self.updates.is_empty() {
            return Err(BatchError::EmptyUpdates);
        }

        if self.updates.len() + self.proof.len() != self.flags.len() + 1 {
            return Err(BatchError::ShapeMismatch {
                updates: self.updates.len(),
                proof: self.proof.len(),
                flags: self.flags.len(),
            });
        }

        Ok(SettlementBatch {
            pre_root,
            post_root,
            updates: self.updates,
            proof: self.proof,
            flags: self.flags,
        })
    }
}

impl Default for SettlementBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
