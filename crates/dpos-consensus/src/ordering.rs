// Canonical evidence ordering
//
// SAFETY INVARIANTS:
// 1. A pair is canonical iff order(evidence, compare_evidence) == Less
// 2. Hash comparators agree with comparing the display hex strings
// 3. Raw-byte comparators agree with comparing the lowercase hex encodings
// 4. Equal keys are never canonical, so one fact pair has exactly one valid layout

use std::cmp::Ordering;

use dpos_core::{BlockEvidence, ProposalEvidence, SidechainIllegalEvidence, VoteEvidence};

pub fn compare_proposal_evidence(a: &ProposalEvidence, b: &ProposalEvidence) -> Ordering {
    a.proposal.hash().compare(&b.proposal.hash())
}

pub fn compare_vote_evidence(a: &VoteEvidence, b: &VoteEvidence) -> Ordering {
    a.vote.hash().compare(&b.vote.hash())
}

/// Raw header bytes, lexicographically.
pub fn compare_block_evidence(a: &BlockEvidence, b: &BlockEvidence) -> Ordering {
    a.header.as_slice().cmp(b.header.as_slice())
}

pub fn compare_sidechain_evidence(a: &SidechainIllegalEvidence, b: &SidechainIllegalEvidence) -> Ordering {
    a.data_hash.compare(&b.data_hash)
}

pub fn is_canonical(order: Ordering) -> bool {
    order == Ordering::Less
}
