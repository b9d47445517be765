// Shared builders for validator and state-machine tests.
//
// Compiled for unit tests, and for integration tests through the
// `test-utils` feature.

use std::cmp::Ordering;
use std::sync::Arc;

use dpos_core::{
    AuxPow, BlockEvidence, BlockHeader, Confirm, DposProposal, DposProposalVote, ProposalEvidence,
    VoteEvidence,
};
use dpos_crypto::{sha256d, SignatureScheme};

use crate::arbitrators::{ArbitratorSet, ArbitratorSetProvider};

pub struct Arbitrator {
    pub private_key: Vec<u8>,
    pub public_key: Vec<u8>,
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn arbitrators(n: usize) -> Vec<Arbitrator> {
    (0..n)
        .map(|_| {
            let (private_key, public_key) = SignatureScheme::keygen();
            Arbitrator { private_key, public_key }
        })
        .collect()
}

/// The first `council` arbitrators also form the council.
pub fn set_of(arbs: &[Arbitrator], council: usize) -> ArbitratorSet {
    let current = arbs.iter().map(|a| a.public_key.clone()).collect();
    let council = arbs[..council].iter().map(|a| a.public_key.clone()).collect();
    ArbitratorSet::new(current, council).unwrap()
}

/// Provider holding one fixed snapshot.
pub struct FixedArbitrators(pub Arc<ArbitratorSet>);

impl ArbitratorSetProvider for FixedArbitrators {
    fn snapshot(&self) -> Arc<ArbitratorSet> {
        Arc::clone(&self.0)
    }
}

pub fn fixed(arbs: &[Arbitrator], council: usize) -> FixedArbitrators {
    FixedArbitrators(Arc::new(set_of(arbs, council)))
}

pub fn header(height: u32, nonce: u32) -> BlockHeader {
    BlockHeader {
        version: 0,
        previous: sha256d(&height.to_le_bytes()),
        merkle_root: sha256d(b"merkle"),
        timestamp: 1_600_000_000 + height,
        bits: 0x1d00ffff,
        nonce,
        height,
        aux_pow: AuxPow::default(),
    }
}

pub fn signed_proposal(sponsor: &Arbitrator, header: &BlockHeader, view_offset: u32) -> DposProposal {
    let mut proposal = DposProposal::new(sponsor.public_key.clone(), header.hash(), view_offset);
    proposal.sign_with(&sponsor.private_key).unwrap();
    proposal
}

pub fn signed_vote(voter: &Arbitrator, proposal: &DposProposal, accept: bool) -> DposProposalVote {
    let mut vote = DposProposalVote::new(proposal.hash(), voter.public_key.clone(), accept);
    vote.sign_with(&voter.private_key).unwrap();
    vote
}

pub fn proposal_evidence(sponsor: &Arbitrator, height: u32, nonce: u32, view_offset: u32) -> ProposalEvidence {
    let header = header(height, nonce);
    ProposalEvidence {
        block_height: height,
        block_header: header.to_bytes().unwrap(),
        proposal: signed_proposal(sponsor, &header, view_offset),
    }
}

pub fn vote_evidence(proposal_evidence: ProposalEvidence, voter: &Arbitrator) -> VoteEvidence {
    let vote = signed_vote(voter, &proposal_evidence.proposal, true);
    VoteEvidence { proposal_evidence, vote }
}

pub fn block_evidence(
    height: u32,
    nonce: u32,
    sponsor: &Arbitrator,
    voters: &[&Arbitrator],
    view_offset: u32,
) -> BlockEvidence {
    block_evidence_for(&header(height, nonce), sponsor, voters, view_offset)
}

/// Evidence for `header`, confirmed by an accept vote from each voter.
pub fn block_evidence_for(
    header: &BlockHeader,
    sponsor: &Arbitrator,
    voters: &[&Arbitrator],
    view_offset: u32,
) -> BlockEvidence {
    let proposal = signed_proposal(sponsor, header, view_offset);
    let votes: Vec<_> = voters.iter().map(|v| signed_vote(v, &proposal, true)).collect();
    let signers = votes.iter().map(|v| v.signer.clone()).collect();
    let confirm = Confirm { proposal, votes };
    BlockEvidence {
        header: header.to_bytes().unwrap(),
        block_confirm: confirm.to_bytes().unwrap(),
        signers,
    }
}

/// Arrange two evidences in canonical order.
pub fn ordered<T>(a: T, b: T, order: impl Fn(&T, &T) -> Ordering) -> (T, T) {
    if order(&a, &b) == Ordering::Less {
        (a, b)
    } else {
        (b, a)
    }
}
