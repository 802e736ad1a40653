use crate::merkle::Digest;
use sha3::{Digest as _, Keccak256};

/// The canonical root of an empty leaf set
pub fn empty_root() -> Digest {
    let out = Keccak256::digest([]);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Digest::from_bytes(bytes)
}

/// Combine two sibling digests into their parent.
///
/// Pairs hash in sorted order, so a verifier needs no left/right
/// position information.
pub fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let mut hasher = Keccak256::new();
    if a.as_bytes() <= b.as_bytes() {
        hasher.update(a.as_bytes());
        hasher.update(b.as_bytes());
    } else {
        hasher.update(b.as_bytes());
        hasher.update(a.as_bytes());
    }
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    Digest::from_bytes(bytes)
}

/// Verify that `leaves` are committed to by `root`, using the sibling
/// digests in `proof` and one combine flag per internal step.
///
/// Each step pops its first operand from the leaves-then-parents queue;
/// the flag selects the second operand from the same queue (`true`) or
/// from `proof` (`false`). The parent is pushed back, and after
/// `flags.len()` steps the single remaining digest must equal `root`.
///
/// An empty leaf set is committed only by the canonical empty root.
/// Malformed input (inconsistent counts, a queue running dry, leftover
/// proof elements) fails verification; this function never panics and
/// never signals an error.
pub fn verify_multiproof(proof: &[Digest], flags: &[bool], root: Digest, leaves: &[Digest]) -> bool {
    if leaves.is_empty() {
        return proof.is_empty() && flags.is_empty() && root == empty_root();
    }

    match process_multiproof(proof, flags, leaves) {
        Some(computed) => computed == root,
        None => false,
    }
}

/// Reconstruct the root, or `None` if the proof is malformed.
fn process_multiproof(proof: &[Digest], flags: &[bool], leaves: &[Digest]) -> Option<Digest> {
    let total_hashes = flags.len();

    // One new parent per flag; every leaf and proof element is consumed
    // exactly once.
    if leaves.len() + proof.len() != total_hashes + 1 {
        return None;
    }

    if total_hashes == 0 {
        return if leaves.len() == 1 {
            Some(leaves[0])
        } else {
            None
        };
    }

    let mut hashes: Vec<Digest> = Vec::with_capacity(total_hashes);
    let mut leaf_pos = 0usize;
    let mut hash_pos = 0usize;
    let mut proof_pos = 0usize;

    for i in 0..total_hashes {
        let a = if leaf_pos < leaves.len() {
            leaf_pos += 1;
            leaves[leaf_pos - 1]
        } else if hash_pos < hashes.len() {
            hash_pos += 1;
            hashes[hash_pos - 1]
        } else {
            return None;
        };

        let b = if flags[i] {
            if leaf_pos < leaves.len() {
                leaf_pos += 1;
                leaves[leaf_pos - 1]
            } else if hash_pos < hashes.len() {
                hash_pos += 1;
                hashes[hash_pos - 1]
            } else {
                return None;
            }
        } else if proof_pos < proof.len() {
            proof_pos += 1;
            proof[proof_pos - 1]
        } else {
            return None;
        };

        hashes.push(hash_pair(&a, &b));
    }

    // Leftover elements mean the flags did not describe this proof.
    if proof_pos != proof.len() || leaf_pos != leaves.len() {
        return None;
    }

    Some(hashes[total_hashes - 1])
}
