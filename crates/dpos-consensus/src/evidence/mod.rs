// Byzantine evidence validation
//
// SAFETY INVARIANTS:
// 1. Validators are pure: same payload + same snapshot → same verdict on every node
// 2. Each entry point reads exactly one arbitrator snapshot
// 3. Validation never panics on hostile input (all errors are typed)

pub mod block;
pub mod inactive;
pub mod proposal;
pub mod sidechain;
pub mod vote;

use dpos_core::{
    DposIllegalBlocks, DposIllegalProposals, DposIllegalVotes, InactiveArbitratorsTransaction,
    ProposalEvidence, SidechainIllegalData, VoteEvidence,
};

use crate::arbitrators::ArbitratorSetProvider;
use crate::config::DposConfig;
use crate::error::EvidenceResult;

pub use block::check_dpos_illegal_blocks;
pub use inactive::check_inactive_arbitrators;
pub use proposal::{check_dpos_illegal_proposals, validate_proposal_evidence};
pub use sidechain::check_sidechain_illegal_evidence;
pub use vote::{check_dpos_illegal_votes, validate_vote_evidence};

/// Validator entry points bound to an arbitrator provider and protocol
/// parameters.
pub struct EvidenceValidator<P: ArbitratorSetProvider> {
    provider: P,
    config: DposConfig,
}

impl<P: ArbitratorSetProvider> EvidenceValidator<P> {
    pub fn new(provider: P, config: DposConfig) -> Self {
        EvidenceValidator { provider, config }
    }

    pub fn config(&self) -> &DposConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn validate_proposal_evidence(&self, evidence: &ProposalEvidence) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        proposal::validate_proposal_evidence(evidence, &arbitrators, &self.config).map(|_| ())
    }

    pub fn validate_vote_evidence(&self, evidence: &VoteEvidence) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        vote::validate_vote_evidence(evidence, &arbitrators, &self.config)
    }

    pub fn check_dpos_illegal_proposals(&self, accusation: &DposIllegalProposals) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        proposal::check_dpos_illegal_proposals(accusation, &arbitrators, &self.config)
    }

    pub fn check_dpos_illegal_votes(&self, accusation: &DposIllegalVotes) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        vote::check_dpos_illegal_votes(accusation, &arbitrators, &self.config)
    }

    pub fn check_dpos_illegal_blocks(&self, accusation: &DposIllegalBlocks) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        block::check_dpos_illegal_blocks(accusation, &arbitrators, &self.config)
    }

    pub fn check_sidechain_illegal_evidence(&self, data: &SidechainIllegalData) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        sidechain::check_sidechain_illegal_evidence(data, &arbitrators)
    }

    pub fn check_inactive_arbitrators(&self, tx: &InactiveArbitratorsTransaction) -> EvidenceResult<()> {
        let arbitrators = self.provider.snapshot();
        inactive::check_inactive_arbitrators(tx, &arbitrators, &self.config)
    }
}
