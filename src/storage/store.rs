// RollupStore - Persistent key-value storage using sled
//
// Durable layout is exactly the ledger state:
// - one balance entry per account ever deposited or settled
// - the current commitment root
// - the fee accumulator and checkpoint counter

use crate::account::AccountId;
use crate::ledger::LedgerStore;
use crate::merkle::Digest;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const BALANCE_PREFIX: &[u8] = b"balance:";
    pub const LEDGER_ROOT: &[u8] = b"ledger:root";
    pub const LEDGER_FEE: &[u8] = b"ledger:fee";
    pub const LEDGER_CHECKPOINT: &[u8] = b"ledger:checkpoint";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Corrupt value for key {key}: {reason}")]
    CorruptValue { key: String, reason: String },

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent key-value store for ledger state
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct RollupStore {
    db: sled::Db,
}

impl RollupStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // RAW KEY-VALUE OPERATIONS
    // ========================================================================

    /// Put raw bytes
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Get raw bytes
    pub fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    /// Delete a key
    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    /// List all keys with a given prefix
    pub fn list_keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut keys = Vec::new();
        for result in self.db.scan_prefix(prefix) {
            let (key, _) = result?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    /// Delete all keys with a given prefix
    pub fn delete_with_prefix(&self, prefix: &[u8]) -> Result<usize, StoreError> {
        let mut deleted = 0;
        for result in self.db.scan_prefix(prefix) {
            let (key, _) = result?;
            self.db.remove(key)?;
            deleted += 1;
        }
        Ok(deleted)
    }

    // ========================================================================
    // LEDGER PERSISTENCE
    // ========================================================================

    /// Save the full ledger state
    pub fn save_ledger(&self, ledger: &LedgerStore) -> Result<(), StoreError> {
        self.delete_with_prefix(keys::BALANCE_PREFIX)?;

        for (account, balance) in ledger.entries() {
            let mut key = keys::BALANCE_PREFIX.to_vec();
            key.extend_from_slice(account.as_bytes());
            self.put_raw(&key, &balance.to_be_bytes())?;
        }

        self.put_raw(keys::LEDGER_ROOT, ledger.current_root().as_bytes())?;
        self.put_raw(keys::LEDGER_FEE, &ledger.total_fee().to_be_bytes())?;
        self.put_raw(
            keys::LEDGER_CHECKPOINT,
            &ledger.checkpoint().to_be_bytes(),
        )?;
        Ok(())
    }

    /// Load the ledger state, or `None` if nothing was ever saved
    pub fn load_ledger(&self) -> Result<Option<LedgerStore>, StoreError> {
        let root_bytes = match self.get_raw(keys::LEDGER_ROOT)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let current_root = Digest::from_bytes(read_array32(keys::LEDGER_ROOT, &root_bytes)?);

        let total_fee = match self.get_raw(keys::LEDGER_FEE)? {
            Some(bytes) => read_u64(keys::LEDGER_FEE, &bytes)?,
            None => 0,
        };
        let checkpoint = match self.get_raw(keys::LEDGER_CHECKPOINT)? {
            Some(bytes) => read_u64(keys::LEDGER_CHECKPOINT, &bytes)?,
            None => 0,
        };

        let mut balances = HashMap::new();
        for result in self.db.scan_prefix(keys::BALANCE_PREFIX) {
            let (key, value) = result?;
            let account_bytes = &key[keys::BALANCE_PREFIX.len()..];
            let account = AccountId::from_bytes(read_array32(&key, account_bytes)?);
            let balance = read_u64(&key, &value)?;
            balances.insert(account, balance);
        }

        Ok(Some(LedgerStore::from_parts(
            balances,
            current_root,
            total_fee,
            checkpoint,
        )))
    }
}

fn read_array32(key: &[u8], bytes: &[u8]) -> Result<[u8; 32], StoreError> {
    bytes.try_into().map_err(|_| StoreError::CorruptValue {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: format!("expected 32 bytes, got {}", bytes.len()),
    })
}

fn read_u64(key: &[u8], bytes: &[u8]) -> Result<u64, StoreError> {
    let array: [u8; 8] = bytes.try_into().map_err(|_| StoreError::CorruptValue {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: format!("expected 8 bytes, got {}", bytes.len()),
    })?;
    Ok(u64::from_be_bytes(array))
}
