// Batch codec tests

use crate::common::account;
use rollvault::merkle::Digest;
use rollvault::settlement::{BatchCodec, CodecError, SettlementBatchBuilder};

fn sample_batch() -> rollvault::settlement::SettlementBatch {
    SettlementBatchBuilder::new()
        .pre_root(Digest::from_bytes([3u8; 32]))
        .post_root(Digest::from_bytes([4u8; 32]))
        .update(account(7), 123_456)
        .update(account(8), 0)
        .proof(vec![Digest::from_bytes([5u8; 32])])
        .flags(vec![true, false])
        .build()
        .unwrap()
}

#[test]
fn test_binary_roundtrip() {
    let batch = sample_batch();
    let decoded = BatchCodec::decode(&BatchCodec::encode(&batch)).unwrap();

    assert_eq!(decoded.pre_root(), batch.pre_root());
    assert_eq!(decoded.post_root(), batch.post_root());
    assert_eq!(decoded.updates(), batch.updates());
    assert_eq!(decoded.proof(), batch.proof());
    assert_eq!(decoded.flags(), batch.flags());
}

#[test]
fn test_hex_roundtrip() {
    let batch = sample_batch();
    let decoded = BatchCodec::decode_hex(&BatchCodec::encode_hex(&batch)).unwrap();
    assert_eq!(decoded.post_root(), batch.post_root());
}

#[test]
fn test_base64_roundtrip() {
    let batch = sample_batch();
    let decoded = BatchCodec::decode_base64(&BatchCodec::encode_base64(&batch)).unwrap();
    assert_eq!(decoded.updates(), batch.updates());
}

#[test]
fn test_invalid_hex_is_rejected() {
    assert!(matches!(
        BatchCodec::decode_hex("not hex!"),
        Err(CodecError::InvalidHex(_))
    ));
}

#[test]
fn test_invalid_base64_is_rejected() {
    assert!(matches!(
        BatchCodec::decode_base64("@@@@"),
        Err(CodecError::InvalidBase64(_))
    ));
}

#[test]
fn test_truncated_bytes_are_rejected() {
    let bytes = BatchCodec::encode(&sample_batch());
    assert!(matches!(
        BatchCodec::decode(&bytes[..bytes.len() / 2]),
        Err(CodecError::DecodeError(_))
    ));
}
