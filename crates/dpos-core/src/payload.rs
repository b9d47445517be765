//! Accusation payloads: pairs of conflicting evidences and inactivity reports.
//!
//! SAFETY INVARIANTS:
//! 1. Paired evidences are compared structurally (`PartialEq`) for the "same" checks
//! 2. Sidechain signing data covers every field except `signs`
//! 3. Payloads carry raw header and confirm bytes; decoding happens at validation time

use serde::{Deserialize, Serialize};

use dpos_crypto::Uint256;

use crate::codec::{self, SigningData};
use crate::dpos::{DposProposal, DposProposalVote};
use crate::CoreResult;

/// Chain whose blocks a block accusation refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinType(pub u8);

impl CoinType {
    pub const ELA: CoinType = CoinType(0);

    pub fn is_known(&self) -> bool {
        *self == CoinType::ELA
    }
}

/// Kind of misbehavior a payload reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IllegalDataType {
    IllegalProposal = 0,
    IllegalVote = 1,
    IllegalBlock = 2,
    SidechainIllegalProposal = 3,
    SidechainIllegalVote = 4,
    InactiveArbitrator = 5,
}

impl IllegalDataType {
    pub fn is_sidechain(&self) -> bool {
        matches!(
            self,
            IllegalDataType::SidechainIllegalProposal | IllegalDataType::SidechainIllegalVote
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IllegalDataType::IllegalProposal => "illegal_proposal",
            IllegalDataType::IllegalVote => "illegal_vote",
            IllegalDataType::IllegalBlock => "illegal_block",
            IllegalDataType::SidechainIllegalProposal => "sidechain_illegal_proposal",
            IllegalDataType::SidechainIllegalVote => "sidechain_illegal_vote",
            IllegalDataType::InactiveArbitrator => "inactive_arbitrator",
        }
    }
}

// ==================== PAIRED EVIDENCES ====================

/// A signed proposal together with the header it proposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEvidence {
    pub block_height: u32,
    /// Encoded `BlockHeader`.
    pub block_header: Vec<u8>,
    pub proposal: DposProposal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEvidence {
    pub proposal_evidence: ProposalEvidence,
    pub vote: DposProposalVote,
}

/// A block header with the confirm that finalized it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvidence {
    /// Encoded `BlockHeader`.
    pub header: Vec<u8>,
    /// Encoded `Confirm`, possibly empty.
    pub block_confirm: Vec<u8>,
    pub signers: Vec<Vec<u8>>,
}

/// Two proposals from the same sponsor at the same height and view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposIllegalProposals {
    pub evidence: ProposalEvidence,
    pub compare_evidence: ProposalEvidence,
}

/// Two votes from the same signer at the same height and view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposIllegalVotes {
    pub evidence: VoteEvidence,
    pub compare_evidence: VoteEvidence,
}

/// Two confirmed blocks at the same height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposIllegalBlocks {
    pub coin_type: CoinType,
    pub block_height: u32,
    pub evidence: BlockEvidence,
    pub compare_evidence: BlockEvidence,
}

// ==================== SIDECHAIN ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainIllegalEvidence {
    pub data_hash: Uint256,
}

/// Arbitrator-signed report of a fault observed on a sidechain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainIllegalData {
    pub illegal_type: IllegalDataType,
    pub height: u32,
    pub illegal_signer: Vec<u8>,
    pub genesis_block_address: String,
    pub evidence: SidechainIllegalEvidence,
    pub compare_evidence: SidechainIllegalEvidence,
    pub signs: Vec<Vec<u8>>,
}

impl SidechainIllegalData {
    /// Bytes each reporting arbitrator signs.
    pub fn data(&self) -> Vec<u8> {
        SigningData::new()
            .put_u8(self.illegal_type as u8)
            .put_u32(self.height)
            .put_var_bytes(&self.illegal_signer)
            .put_var_bytes(self.genesis_block_address.as_bytes())
            .put_fixed(self.evidence.data_hash.as_bytes())
            .put_fixed(self.compare_evidence.data_hash.as_bytes())
            .finish()
    }
}

// ==================== INACTIVE ARBITRATORS ====================

/// Accusation that some arbitrators stopped participating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactiveArbitrators {
    pub sponsor: Vec<u8>,
    pub arbitrators: Vec<Vec<u8>>,
    pub block_height: u32,
}

/// Redeem script plus its signature parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub code: Vec<u8>,
    pub parameter: Vec<u8>,
}

/// Transaction carrying an inactivity accusation and the council multisig
/// program that authorizes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactiveArbitratorsTransaction {
    pub payload: InactiveArbitrators,
    pub programs: Vec<Program>,
}

impl InactiveArbitratorsTransaction {
    pub fn to_bytes(&self) -> CoreResult<Vec<u8>> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        codec::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_crypto::sha256d;

    fn sidechain_data() -> SidechainIllegalData {
        SidechainIllegalData {
            illegal_type: IllegalDataType::SidechainIllegalProposal,
            height: 100,
            illegal_signer: vec![0x02; 33],
            genesis_block_address: "XQd1DCi6H62NQdWZQhJCRnrPn7sF9CTjaU".to_string(),
            evidence: SidechainIllegalEvidence { data_hash: sha256d(b"a") },
            compare_evidence: SidechainIllegalEvidence { data_hash: sha256d(b"b") },
            signs: Vec::new(),
        }
    }

    #[test]
    fn test_sidechain_data_excludes_signs() {
        let unsigned = sidechain_data();
        let mut signed = unsigned.clone();
        signed.signs.push(vec![1; 64]);
        assert_eq!(unsigned.data(), signed.data());
    }

    #[test]
    fn test_sidechain_data_covers_type_and_height() {
        let base = sidechain_data();
        let mut other_type = base.clone();
        other_type.illegal_type = IllegalDataType::SidechainIllegalVote;
        let mut other_height = base.clone();
        other_height.height += 1;
        assert_ne!(base.data(), other_type.data());
        assert_ne!(base.data(), other_height.data());
    }

    #[test]
    fn test_illegal_data_type_values() {
        assert_eq!(IllegalDataType::IllegalProposal as u8, 0);
        assert_eq!(IllegalDataType::InactiveArbitrator as u8, 5);
        assert!(IllegalDataType::SidechainIllegalVote.is_sidechain());
        assert!(!IllegalDataType::IllegalBlock.is_sidechain());
    }

    #[test]
    fn test_coin_type() {
        assert!(CoinType::ELA.is_known());
        assert!(CoinType::default().is_known());
        assert!(!CoinType(1).is_known());
    }

    #[test]
    fn test_inactive_transaction_round_trip() {
        let tx = InactiveArbitratorsTransaction {
            payload: InactiveArbitrators {
                sponsor: vec![0x02; 33],
                arbitrators: vec![vec![0x03; 33]],
                block_height: 12,
            },
            programs: vec![Program { code: vec![0x51], parameter: vec![0x40] }],
        };
        assert_eq!(InactiveArbitratorsTransaction::from_bytes(&tx.to_bytes().unwrap()).unwrap(), tx);
    }
}
