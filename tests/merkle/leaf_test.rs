// Leaf encoding tests

use crate::common::account;
use rollvault::account::{AccountId, Keypair};
use rollvault::merkle::{encode_entry, leaf_digest};

#[test]
fn test_encoding_is_forty_bytes() {
    let encoded = encode_entry(&account(1), 77);
    assert_eq!(encoded.len(), 40);
}

#[test]
fn test_encoding_places_balance_big_endian() {
    let encoded = encode_entry(&account(1), 1);
    assert_eq!(&encoded[32..], &[0, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_leaf_changes_with_account() {
    assert_ne!(leaf_digest(&account(1), 50), leaf_digest(&account(2), 50));
}

#[test]
fn test_leaf_changes_with_balance() {
    assert_ne!(leaf_digest(&account(1), 50), leaf_digest(&account(1), 51));
}

#[test]
fn test_leaf_for_key_derived_account() {
    let kp = Keypair::generate();
    let acct = AccountId::from_public_key(&kp.public_key());

    // Same key, same entry, same leaf
    let again = AccountId::from_public_key(&kp.public_key());
    assert_eq!(leaf_digest(&acct, 9), leaf_digest(&again, 9));
}

#[test]
fn test_zero_balance_is_a_valid_leaf() {
    let acct = account(3);
    assert_ne!(leaf_digest(&acct, 0), leaf_digest(&acct, 1));
}
