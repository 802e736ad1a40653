// Deposit handler tests - the external-transfer-first contract

use crate::common::{account, commit_root};
use rollvault::deposit::{
    DepositError, DepositEvent, DepositHandler, MockTokenLedger, TokenLedger,
};
use rollvault::ledger::{LedgerError, LedgerStore};
use std::sync::Arc;

const GWEI: u64 = 1_000_000_000;

fn initialized_store(owner: &rollvault::account::AccountId) -> LedgerStore {
    let mut store = LedgerStore::new();
    store
        .initialize(commit_root(&[(owner.clone(), 0)]))
        .unwrap();
    store
}

// ============================================================================
// SUCCESSFUL DEPOSITS
// ============================================================================

#[tokio::test]
async fn test_deposit_credits_exact_amount() {
    let owner = account(0x21);
    let vault = account(0xEE);
    let token = Arc::new(MockTokenLedger::new());
    token.mint(&owner, 5 * GWEI);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(vault.clone(), token.clone());

    handler.deposit(&mut store, &owner, GWEI).await.unwrap();

    assert_eq!(store.locked_balance(&owner), GWEI);
    // The pooled funds moved on the external ledger too
    assert_eq!(token.balance_of(&vault).await, GWEI);
    assert_eq!(token.balance_of(&owner).await, 4 * GWEI);
}

#[tokio::test]
async fn test_deposits_accumulate() {
    let owner = account(0x22);
    let token = Arc::new(MockTokenLedger::new());
    token.mint(&owner, 100);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token);

    handler.deposit(&mut store, &owner, 30).await.unwrap();
    handler.deposit(&mut store, &owner, 45).await.unwrap();

    assert_eq!(store.locked_balance(&owner), 75);
    assert_eq!(handler.stats().deposits_completed, 2);
    assert_eq!(handler.stats().total_deposited, 75);
}

#[tokio::test]
async fn test_deposit_emits_event_with_tx_id() {
    let owner = account(0x23);
    let token = Arc::new(MockTokenLedger::new());
    token.mint(&owner, 50);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token);

    handler.deposit(&mut store, &owner, 50).await.unwrap();

    let events = handler.poll_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DepositEvent::Deposited {
            account: acct,
            amount,
            tx_id,
        } => {
            assert_eq!(acct, &owner);
            assert_eq!(*amount, 50);
            assert!(tx_id.starts_with("tx-mock-"));
        }
    }
}

// ============================================================================
// FAILED DEPOSITS
// ============================================================================

#[tokio::test]
async fn test_deposit_without_external_funds_changes_nothing() {
    let owner = account(0x24);
    let token = Arc::new(MockTokenLedger::new());

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token);
    let before = store.snapshot();

    let result = handler.deposit(&mut store, &owner, GWEI).await;

    assert!(matches!(
        result,
        Err(DepositError::ExternalTransferFailed(_))
    ));
    assert_eq!(store.snapshot(), before);
    assert_eq!(handler.stats().deposits_failed, 1);
}

#[tokio::test]
async fn test_injected_transfer_failure_changes_nothing() {
    let owner = account(0x25);
    let token = Arc::new(MockTokenLedger::new().with_failure("chain halted".to_string()));
    token.mint(&owner, GWEI);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token);

    let result = handler.deposit(&mut store, &owner, GWEI).await;

    match result {
        Err(DepositError::ExternalTransferFailed(message)) => {
            assert_eq!(message, "chain halted");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(store.locked_balance(&owner), 0);
}

#[tokio::test]
async fn test_zero_amount_is_rejected_before_transfer() {
    let owner = account(0x26);
    let token = Arc::new(MockTokenLedger::new());

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token.clone());

    let result = handler.deposit(&mut store, &owner, 0).await;

    assert!(matches!(result, Err(DepositError::InvalidAmount)));
    assert_eq!(token.transfer_calls(), 0);
}

#[tokio::test]
async fn test_uninitialized_store_is_rejected_before_transfer() {
    let owner = account(0x27);
    let token = Arc::new(MockTokenLedger::new());
    token.mint(&owner, GWEI);

    let mut store = LedgerStore::new();
    let mut handler = DepositHandler::new(account(0xEE), token.clone());

    let result = handler.deposit(&mut store, &owner, GWEI).await;

    assert!(matches!(
        result,
        Err(DepositError::Ledger(LedgerError::NotInitialized))
    ));
    assert_eq!(token.transfer_calls(), 0);
}

#[tokio::test]
async fn test_overflow_is_caught_before_funds_move() {
    let owner = account(0x28);
    let token = Arc::new(MockTokenLedger::new());
    token.mint(&owner, u64::MAX);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token.clone());

    handler.deposit(&mut store, &owner, u64::MAX).await.unwrap();
    token.mint(&owner, 1);

    let result = handler.deposit(&mut store, &owner, 1).await;

    assert!(matches!(
        result,
        Err(DepositError::Ledger(LedgerError::BalanceOverflow))
    ));
    // The second transfer never reached the token ledger
    assert_eq!(token.transfer_calls(), 1);
    assert_eq!(store.locked_balance(&owner), u64::MAX);
}

#[tokio::test]
async fn test_failures_then_success() {
    let owner = account(0x29);
    let token = Arc::new(MockTokenLedger::new().with_failures_then_success(2));
    token.mint(&owner, 90);

    let mut store = initialized_store(&owner);
    let mut handler = DepositHandler::new(account(0xEE), token);

    assert!(handler.deposit(&mut store, &owner, 30).await.is_err());
    assert!(handler.deposit(&mut store, &owner, 30).await.is_err());
    handler.deposit(&mut store, &owner, 30).await.unwrap();

    assert_eq!(store.locked_balance(&owner), 30);
    assert_eq!(handler.stats().deposits_failed, 2);
    assert_eq!(handler.stats().deposits_completed, 1);
}
