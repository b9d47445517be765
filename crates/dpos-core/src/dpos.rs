// DPoS round messages: proposals, votes and confirms.
//
// SAFETY INVARIANTS:
// 1. A message's identity hash covers every field except its signature
// 2. A signature is always over `data()`, never over the encoded message
// 3. A confirm is only as trustworthy as the checks its consumer runs on it

use serde::{Deserialize, Serialize};

use dpos_crypto::{sha256d, SignatureScheme, Uint256};

use crate::codec::{self, SigningData};
use crate::CoreResult;

/// A sponsor's proposal of a block for the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposProposal {
    pub sponsor: Vec<u8>,
    pub block_hash: Uint256,
    pub view_offset: u32,
    pub sign: Vec<u8>,
}

impl DposProposal {
    pub fn new(sponsor: Vec<u8>, block_hash: Uint256, view_offset: u32) -> Self {
        Self {
            sponsor,
            block_hash,
            view_offset,
            sign: Vec::new(),
        }
    }

    /// Bytes the sponsor signs.
    pub fn data(&self) -> Vec<u8> {
        SigningData::new()
            .put_var_bytes(&self.sponsor)
            .put_fixed(self.block_hash.as_bytes())
            .put_u32(self.view_offset)
            .finish()
    }

    pub fn hash(&self) -> Uint256 {
        sha256d(&self.data())
    }

    pub fn sign_with(&mut self, private_key: &[u8]) -> CoreResult<()> {
        self.sign = SignatureScheme::sign(private_key, &self.data())?;
        Ok(())
    }

    pub fn verify_signature(&self) -> bool {
        SignatureScheme::verify(&self.sponsor, &self.data(), &self.sign)
    }
}

/// An arbitrator's accept or reject vote on a proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposProposalVote {
    pub proposal_hash: Uint256,
    pub signer: Vec<u8>,
    pub accept: bool,
    pub sign: Vec<u8>,
}

impl DposProposalVote {
    pub fn new(proposal_hash: Uint256, signer: Vec<u8>, accept: bool) -> Self {
        Self {
            proposal_hash,
            signer,
            accept,
            sign: Vec::new(),
        }
    }

    pub fn data(&self) -> Vec<u8> {
        SigningData::new()
            .put_fixed(self.proposal_hash.as_bytes())
            .put_var_bytes(&self.signer)
            .put_bool(self.accept)
            .finish()
    }

    pub fn hash(&self) -> Uint256 {
        sha256d(&self.data())
    }

    pub fn sign_with(&mut self, private_key: &[u8]) -> CoreResult<()> {
        self.sign = SignatureScheme::sign(private_key, &self.data())?;
        Ok(())
    }

    pub fn verify_signature(&self) -> bool {
        SignatureScheme::verify(&self.signer, &self.data(), &self.sign)
    }
}

/// A proposal together with the votes that confirmed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirm {
    pub proposal: DposProposal,
    pub votes: Vec<DposProposalVote>,
}

impl Confirm {
    pub fn to_bytes(&self) -> CoreResult<Vec<u8>> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        codec::decode(bytes)
    }

    /// Vote signers in vote order.
    pub fn signers(&self) -> impl Iterator<Item = &[u8]> {
        self.votes.iter().map(|v| v.signer.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_hash_excludes_signature() {
        let (private_key, public_key) = SignatureScheme::keygen();
        let mut proposal = DposProposal::new(public_key, sha256d(b"block"), 0);
        let unsigned = proposal.hash();
        proposal.sign_with(&private_key).unwrap();
        assert_eq!(proposal.hash(), unsigned);
        assert!(proposal.verify_signature());
    }

    #[test]
    fn test_tampered_proposal_fails_verification() {
        let (private_key, public_key) = SignatureScheme::keygen();
        let mut proposal = DposProposal::new(public_key, sha256d(b"block"), 0);
        proposal.sign_with(&private_key).unwrap();
        proposal.view_offset = 1;
        assert!(!proposal.verify_signature());
    }

    #[test]
    fn test_vote_identity_depends_on_accept() {
        let (_, signer) = SignatureScheme::keygen();
        let accept = DposProposalVote::new(sha256d(b"p"), signer.clone(), true);
        let reject = DposProposalVote::new(sha256d(b"p"), signer, false);
        assert_ne!(accept.hash(), reject.hash());
    }

    #[test]
    fn test_confirm_bytes_round_trip() {
        let (sponsor_key, sponsor) = SignatureScheme::keygen();
        let mut proposal = DposProposal::new(sponsor, sha256d(b"block"), 2);
        proposal.sign_with(&sponsor_key).unwrap();

        let mut votes = Vec::new();
        for _ in 0..3 {
            let (key, signer) = SignatureScheme::keygen();
            let mut vote = DposProposalVote::new(proposal.hash(), signer, true);
            vote.sign_with(&key).unwrap();
            votes.push(vote);
        }
        let confirm = Confirm { proposal, votes };

        let decoded = Confirm::from_bytes(&confirm.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, confirm);
        assert_eq!(decoded.signers().count(), 3);
        assert!(decoded.votes.iter().all(|v| v.verify_signature()));
    }

    #[test]
    fn test_empty_confirm_bytes_do_not_parse() {
        assert!(Confirm::from_bytes(&[]).is_err());
    }
}
