// Deterministic wire codec.
//
// SAFETY INVARIANTS:
// 1. Fixed-width integer encoding (no varints), so field layout never depends on values
// 2. Trailing bytes after a decoded value are rejected
// 3. Decoding is size-limited, so hostile length prefixes cannot force large allocations

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{CoreError, CoreResult};

/// Upper bound for any single encoded header, confirm or payload.
pub const MAX_ENCODED_SIZE: u64 = 8 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
        .with_limit(MAX_ENCODED_SIZE)
}

pub fn encode<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| CoreError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CoreResult<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| CoreError::Decode(e.to_string()))
}

/// Append-only builder for hash preimages and signing data.
///
/// Infallible by construction: every field is written as little-endian fixed
/// width, and variable-length fields carry a `u32` length prefix.
#[derive(Debug, Default)]
pub struct SigningData {
    buf: Vec<u8>,
}

impl SigningData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub fn put_u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn put_fixed(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn put_var_bytes(self, bytes: &[u8]) -> Self {
        self.put_u32(bytes.len() as u32).put_fixed(bytes)
    }

    pub fn put_bool(self, v: bool) -> Self {
        self.put_u8(v as u8)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        height: u32,
        data: Vec<u8>,
    }

    #[test]
    fn test_encode_decode() {
        let sample = Sample { height: 7, data: vec![1, 2, 3] };
        let bytes = encode(&sample).unwrap();
        // 4 (height) + 8 (length) + 3
        assert_eq!(bytes.len(), 15);
        assert_eq!(decode::<Sample>(&bytes).unwrap(), sample);
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = encode(&Sample { height: 1, data: vec![] }).unwrap();
        bytes.push(0);
        assert!(matches!(decode::<Sample>(&bytes), Err(CoreError::Decode(_))));
    }

    #[test]
    fn test_rejects_oversized_length_prefix() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(decode::<Sample>(&bytes).is_err());
    }

    #[test]
    fn test_signing_data_layout() {
        let data = SigningData::new()
            .put_u32(1)
            .put_var_bytes(&[0xAA, 0xBB])
            .put_bool(true)
            .finish();
        assert_eq!(data, vec![1, 0, 0, 0, 2, 0, 0, 0, 0xAA, 0xBB, 1]);
    }
}
