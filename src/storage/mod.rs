// Storage module - PERSISTENCE
// Durable ledger state using sled

mod store;

pub use store::{RollupStore, StorageStats, StoreError};
