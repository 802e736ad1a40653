// TokenLedger - the external fungible-token ledger
// The verifier never custodies transferable assets itself; it asks the
// token ledger to move them and only mirrors the result

use crate::account::AccountId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// TOKEN LEDGER TRAIT
// ============================================================================

/// Trait for the external token ledger holding the transferable asset
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Move `amount` from `from` to `to`.
    /// Returns transaction ID on success, error message on failure
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<String, String>;

    /// Get the ledger balance of an account
    async fn balance_of(&self, account: &AccountId) -> u64;
}

// ============================================================================
// MOCK TOKEN LEDGER
// ============================================================================

/// Mock implementation of TokenLedger for testing
pub struct MockTokenLedger {
    balances: Mutex<HashMap<AccountId, u64>>,
    failure_message: Option<String>,
    delay_ms: u64,
    failures_before_success: AtomicUsize,
    call_count: AtomicUsize,
}

impl MockTokenLedger {
    /// Create a new mock ledger with no balances
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            failure_message: None,
            delay_ms: 0,
            failures_before_success: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Configure to always fail with a message
    pub fn with_failure(mut self, message: String) -> Self {
        self.failure_message = Some(message);
        self
    }

    /// Add a delay before responding
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Fail N times, then behave normally
    pub fn with_failures_then_success(mut self, failures: usize) -> Self {
        self.failures_before_success = AtomicUsize::new(failures);
        self
    }

    /// Credit an account out of thin air (test setup)
    pub fn mint(&self, account: &AccountId, amount: u64) {
        let mut balances = self.balances.lock().unwrap();
        let entry = balances.entry(account.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Get the number of transfer calls seen so far
    pub fn transfer_calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenLedger for MockTokenLedger {
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<String, String> {
        // Apply delay if configured
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        let failures_remaining = self.failures_before_success.load(Ordering::SeqCst);

        if failures_remaining > 0 && call_num < failures_remaining {
            return Err(self
                .failure_message
                .clone()
                .unwrap_or_else(|| "Mock failure".to_string()));
        }

        if let Some(message) = &self.failure_message {
            return Err(message.clone());
        }

        let mut balances = self.balances.lock().unwrap();
        let from_balance = balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(format!(
                "insufficient balance: available {}, required {}",
                from_balance, amount
            ));
        }

        balances.insert(from.clone(), from_balance - amount);
        let to_balance = balances.get(to).copied().unwrap_or(0);
        balances.insert(to.clone(), to_balance.saturating_add(amount));

        Ok(format!("tx-mock-{}", call_num))
    }

    async fn balance_of(&self, account: &AccountId) -> u64 {
        self.balances.lock().unwrap().get(account).copied().unwrap_or(0)
    }
}
