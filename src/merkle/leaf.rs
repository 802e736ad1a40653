use crate::account::AccountId;
use crate::merkle::Digest;
use sha3::{Digest as _, Keccak256};

/// Canonically encode an (account, balance) pair: 32 account bytes
/// followed by the balance as 8 big-endian bytes.
pub fn encode_entry(account: &AccountId, balance: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(40);
    out.extend_from_slice(account.as_bytes());
    out.extend_from_slice(&balance.to_be_bytes());
    out
}

/// Compute the state leaf for an (account, balance) pair.
///
/// The encoding is hashed twice: a leaf digest must never be
/// reinterpretable as an interior node, and the second hash separates
/// the two domains.
pub fn leaf_digest(account: &AccountId, balance: u64) -> Digest {
    let inner = Keccak256::digest(encode_entry(account, balance));
    let outer = Keccak256::digest(inner);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&outer);
    Digest::from_bytes(bytes)
}
