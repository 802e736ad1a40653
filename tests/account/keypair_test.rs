// Keypair tests

use rollvault::account::{Keypair, KeypairError, PublicKey};

#[test]
fn test_generate_gives_distinct_keys() {
    let a = Keypair::generate();
    let b = Keypair::generate();
    assert_ne!(a.public_key(), b.public_key());
}

#[test]
fn test_keypair_byte_roundtrip() {
    let kp = Keypair::generate();
    let restored = Keypair::from_bytes(&kp.to_bytes()).unwrap();
    assert_eq!(kp.public_key(), restored.public_key());
}

#[test]
fn test_public_key_byte_roundtrip() {
    let kp = Keypair::generate();
    let pk = kp.public_key();
    let restored = PublicKey::from_bytes(pk.as_bytes()).unwrap();
    assert_eq!(pk, restored);
}

#[test]
fn test_wrong_length_is_rejected() {
    assert!(matches!(
        Keypair::from_bytes(&[0u8; 16]),
        Err(KeypairError::InvalidLength {
            expected: 32,
            got: 16
        })
    ));
}
