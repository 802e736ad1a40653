// Merkle module - THE COMMITMENT SCHEME
// Digests, leaf encoding, and multiproof verification against a state root

mod digest;
mod leaf;
mod multiproof;

pub use digest::Digest;
pub use leaf::{encode_entry, leaf_digest};
pub use multiproof::{empty_root, hash_pair, verify_multiproof};
