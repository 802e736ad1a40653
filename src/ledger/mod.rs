// Ledger module - THE MUTABLE STATE
// Locked balances, the current commitment root, and the fee accumulator

mod store;

pub use store::{LedgerError, LedgerSnapshot, LedgerStore};
