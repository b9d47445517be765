//! Fixed-width hash types and SHA-256d hashing.
//!
//! Hashes are stored in wire (little-endian) byte order and rendered as the
//! byte-reversed hex string, the same way block explorers print them.
//!
//! SAFETY GUARANTEES:
//! - `Uint256::compare` agrees bit-for-bit with comparing the rendered hex strings
//! - Hashing is deterministic (no randomness, no platform dependence)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;

use crate::{CryptoError, CryptoResult};

pub const UINT256_SIZE: usize = 32;
pub const UINT168_SIZE: usize = 21;

/// SHA-256 applied twice.
pub fn sha256d(data: &[u8]) -> Uint256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut output = [0u8; UINT256_SIZE];
    output.copy_from_slice(&second);
    Uint256(output)
}

/// 256-bit hash (block hashes, proposal and vote identities, data hashes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uint256(pub [u8; UINT256_SIZE]);

impl Uint256 {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != UINT256_SIZE {
            return Err(CryptoError::InvalidLength {
                expected: UINT256_SIZE,
                got: bytes.len(),
            });
        }
        let mut output = [0u8; UINT256_SIZE];
        output.copy_from_slice(bytes);
        Ok(Uint256(output))
    }

    /// Parse the display form (byte-reversed hex).
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let mut bytes = hex::decode(s)
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("bad hex: {}", e)))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; UINT256_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Compare from the most significant (last) byte down.
    ///
    /// SAFETY: Consensus visible. This is the order of the display hex
    /// strings, so two nodes that compare strings and two nodes that compare
    /// bytes always agree.
    pub fn compare(&self, other: &Uint256) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

/// 168-bit program hash: one prefix byte followed by a 160-bit script digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uint168(pub [u8; UINT168_SIZE]);

impl Uint168 {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != UINT168_SIZE {
            return Err(CryptoError::InvalidLength {
                expected: UINT168_SIZE,
                got: bytes.len(),
            });
        }
        let mut output = [0u8; UINT168_SIZE];
        output.copy_from_slice(bytes);
        Ok(Uint168(output))
    }

    pub fn as_bytes(&self) -> &[u8; UINT168_SIZE] {
        &self.0
    }

    pub fn prefix(&self) -> u8 {
        self.0[0]
    }
}
