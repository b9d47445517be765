use serde::{Deserialize, Serialize};

use dpos_crypto::{sha256d, Uint256};

use crate::codec::{self, SigningData};
use crate::CoreResult;

/// Parent-chain (BTC-style) header embedded in a merged-mining proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcHeader {
    pub version: i32,
    pub previous: Uint256,
    pub merkle_root: Uint256,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BtcHeader {
    pub fn hash(&self) -> Uint256 {
        let preimage = SigningData::new()
            .put_u32(self.version as u32)
            .put_fixed(self.previous.as_bytes())
            .put_fixed(self.merkle_root.as_bytes())
            .put_u32(self.timestamp)
            .put_u32(self.bits)
            .put_u32(self.nonce)
            .finish();
        sha256d(&preimage)
    }
}

/// Merged-mining proof linking a block to work done on a parent chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxPow {
    pub aux_merkle_branch: Vec<Uint256>,
    pub aux_merkle_index: i32,
    pub parent_coinbase: Vec<u8>,
    pub parent_merkle_branch: Vec<Uint256>,
    pub parent_merkle_index: i32,
    pub parent_block_header: BtcHeader,
    pub parent_hash: Uint256,
}

/// Block header.
///
/// SAFETY INVARIANTS:
/// 1. The identity hash covers every field except `aux_pow`
/// 2. Two headers that differ only in their merged-mining proof have the same hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u32,
    pub previous: Uint256,
    pub merkle_root: Uint256,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
    pub aux_pow: AuxPow,
}

impl BlockHeader {
    /// SHA-256d over the header without its aux-pow.
    pub fn hash(&self) -> Uint256 {
        let preimage = SigningData::new()
            .put_u32(self.version)
            .put_fixed(self.previous.as_bytes())
            .put_fixed(self.merkle_root.as_bytes())
            .put_u32(self.timestamp)
            .put_u32(self.bits)
            .put_u32(self.nonce)
            .put_u32(self.height)
            .finish();
        sha256d(&preimage)
    }

    pub fn to_bytes(&self) -> CoreResult<Vec<u8>> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        codec::decode(bytes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// Serialized transactions; opaque to the accountability layer.
    pub transactions: Vec<Vec<u8>>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Vec<u8>>) -> Self {
        Self { header, transactions }
    }

    pub fn hash(&self) -> Uint256 {
        self.header.hash()
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }
}
