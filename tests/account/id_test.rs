// Account ID tests

use rollvault::account::{AccountId, Keypair};

#[test]
fn test_derivation_is_deterministic() {
    let kp = Keypair::generate();
    assert_eq!(
        AccountId::from_public_key(&kp.public_key()),
        AccountId::from_public_key(&kp.public_key())
    );
}

#[test]
fn test_different_keys_give_different_accounts() {
    let a = AccountId::from_public_key(&Keypair::generate().public_key());
    let b = AccountId::from_public_key(&Keypair::generate().public_key());
    assert_ne!(a, b);
}

#[test]
fn test_byte_roundtrip() {
    let id = AccountId::generate();
    assert_eq!(AccountId::from_bytes(id.to_bytes()), id);
}

#[test]
fn test_display_is_short_hex() {
    let id = AccountId::from_bytes([0xCD; 32]);
    assert_eq!(id.to_string(), "acct:cdcdcdcdcdcdcdcd");
}
