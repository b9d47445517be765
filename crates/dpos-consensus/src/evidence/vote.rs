use dpos_core::{DposIllegalVotes, VoteEvidence};
use log::warn;

use crate::arbitrators::ArbitratorSet;
use crate::config::DposConfig;
use crate::error::{EvidenceError, EvidenceResult};
use crate::evidence::proposal::validate_proposal_evidence;
use crate::ordering::{compare_vote_evidence, is_canonical};

/// Validate a single vote evidence: its proposal evidence, the vote's link to
/// that proposal, and the signer's signature.
pub fn validate_vote_evidence(
    evidence: &VoteEvidence,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    validate_proposal_evidence(&evidence.proposal_evidence, arbitrators, config)?;

    let vote = &evidence.vote;
    if vote.proposal_hash != evidence.proposal_evidence.proposal.hash() {
        return Err(EvidenceError::VoteProposalMismatch);
    }
    if !arbitrators.is_arbitrator(&vote.signer) || !vote.verify_signature() {
        return Err(EvidenceError::InvalidVoteSignature);
    }
    Ok(())
}

/// Validate an accusation that one arbitrator cast two conflicting votes in
/// the same sponsor's round.
pub fn check_dpos_illegal_votes(
    accusation: &DposIllegalVotes,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let (evidence, compare) = (&accusation.evidence, &accusation.compare_evidence);

    let result = (|| {
        if evidence.vote.hash() == compare.vote.hash() {
            return Err(EvidenceError::SameVote);
        }

        validate_vote_evidence(evidence, arbitrators, config)?;
        validate_vote_evidence(compare, arbitrators, config)?;

        if !is_canonical(compare_vote_evidence(evidence, compare)) {
            return Err(EvidenceError::OrderError);
        }

        let (p1, p2) = (&evidence.proposal_evidence, &compare.proposal_evidence);
        if p1.block_height != p2.block_height {
            return Err(EvidenceError::HeightMismatch);
        }
        if p1.proposal.sponsor != p2.proposal.sponsor {
            return Err(EvidenceError::SponsorMismatch);
        }
        if p1.proposal.view_offset != p2.proposal.view_offset {
            return Err(EvidenceError::ViewMismatch);
        }
        if evidence.vote.signer != compare.vote.signer {
            return Err(EvidenceError::SignerMismatch);
        }
        Ok(())
    })();

    if let Err(ref e) = result {
        warn!("Rejected illegal votes accusation: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn accusation(a: VoteEvidence, b: VoteEvidence) -> DposIllegalVotes {
        let (evidence, compare_evidence) = ordered(a, b, compare_vote_evidence);
        DposIllegalVotes { evidence, compare_evidence }
    }

    #[test]
    fn test_valid_double_vote() {
        init_logger();
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        let config = DposConfig::default();

        let acc = accusation(
            vote_evidence(proposal_evidence(&arbs[0], 50, 1, 0), &arbs[2]),
            vote_evidence(proposal_evidence(&arbs[0], 50, 2, 0), &arbs[2]),
        );
        assert_eq!(check_dpos_illegal_votes(&acc, &set, &config), Ok(()));

        let swapped = DposIllegalVotes {
            evidence: acc.compare_evidence,
            compare_evidence: acc.evidence,
        };
        assert_eq!(
            check_dpos_illegal_votes(&swapped, &set, &config),
            Err(EvidenceError::OrderError)
        );
    }

    #[test]
    fn test_identical_votes() {
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        let e = vote_evidence(proposal_evidence(&arbs[0], 50, 1, 0), &arbs[2]);
        let acc = DposIllegalVotes { evidence: e.clone(), compare_evidence: e };
        assert_eq!(
            check_dpos_illegal_votes(&acc, &set, &DposConfig::default()),
            Err(EvidenceError::SameVote)
        );
    }

    #[test]
    fn test_context_mismatches() {
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        let config = DposConfig::default();

        let cases = vec![
            (proposal_evidence(&arbs[0], 51, 2, 0), &arbs[2], EvidenceError::HeightMismatch),
            (proposal_evidence(&arbs[1], 50, 2, 0), &arbs[2], EvidenceError::SponsorMismatch),
            (proposal_evidence(&arbs[0], 50, 2, 1), &arbs[2], EvidenceError::ViewMismatch),
            (proposal_evidence(&arbs[0], 50, 2, 0), &arbs[3], EvidenceError::SignerMismatch),
        ];
        for (other, voter, expected) in cases {
            let acc = accusation(
                vote_evidence(proposal_evidence(&arbs[0], 50, 1, 0), &arbs[2]),
                vote_evidence(other, voter),
            );
            assert_eq!(check_dpos_illegal_votes(&acc, &set, &config), Err(expected));
        }
    }

    #[test]
    fn test_validate_vote_evidence_errors() {
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        let config = DposConfig::default();
        let good = vote_evidence(proposal_evidence(&arbs[0], 50, 1, 0), &arbs[2]);
        assert_eq!(validate_vote_evidence(&good, &set, &config), Ok(()));

        let mut unlinked = good.clone();
        unlinked.vote = signed_vote(&arbs[2], &proposal_evidence(&arbs[0], 50, 2, 0).proposal, true);
        assert_eq!(
            validate_vote_evidence(&unlinked, &set, &config),
            Err(EvidenceError::VoteProposalMismatch)
        );

        let mut forged = good.clone();
        forged.vote.accept = false;
        assert_eq!(
            validate_vote_evidence(&forged, &set, &config),
            Err(EvidenceError::InvalidVoteSignature)
        );

        let outsider = arbitrators(1).remove(0);
        let foreign = vote_evidence(proposal_evidence(&arbs[0], 50, 1, 0), &outsider);
        assert_eq!(
            validate_vote_evidence(&foreign, &set, &config),
            Err(EvidenceError::InvalidVoteSignature)
        );
    }
}
