// RollVault - Balance-locking rollup settlement verifier
//
// Holds a ledger of locked token balances, advances a single committed
// state root only when a batch of balance updates is proven against it
// with a Merkle multiproof, and accumulates every withdrawn balance as
// a fee. Deposits flow in from an external token ledger; settlements
// are the only path that decreases a locked balance.

pub mod account;
pub mod deposit;
pub mod ledger;
pub mod merkle;
pub mod settlement;
pub mod storage;
