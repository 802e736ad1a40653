use crate::settlement::SettlementBatch;
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode batch: {0}")]
    DecodeError(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid base64 string: {0}")]
    InvalidBase64(String),
}

/// Codec for serializing/deserializing settlement batches.
///
/// Batches are computed off-chain, so they travel to the settlement
/// caller out-of-band; this gives them a compact binary form plus text
/// renderings.
pub struct BatchCodec;

impl BatchCodec {
    /// Encode a batch to binary bytes (using postcard for compact serialization)
    pub fn encode(batch: &SettlementBatch) -> Vec<u8> {
        postcard::to_allocvec(batch).expect("Failed to encode batch")
    }

    /// Decode a batch from binary bytes
    pub fn decode(bytes: &[u8]) -> Result<SettlementBatch, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    /// Encode to hex string
    pub fn encode_hex(batch: &SettlementBatch) -> String {
        hex::encode(Self::encode(batch))
    }

    /// Decode from hex string
    pub fn decode_hex(hex_str: &str) -> Result<SettlementBatch, CodecError> {
        let bytes = hex::decode(hex_str).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::decode(&bytes)
    }

    /// Encode to base64 string (URL-safe, no padding)
    pub fn encode_base64(batch: &SettlementBatch) -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        URL_SAFE_NO_PAD.encode(Self::encode(batch))
    }

    /// Decode from base64 string
    pub fn decode_base64(b64_str: &str) -> Result<SettlementBatch, CodecError> {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        let bytes = URL_SAFE_NO_PAD
            .decode(b64_str)
            .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
        Self::decode(&bytes)
    }
}
