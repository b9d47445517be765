use dpos_core::{BlockHeader, DposIllegalProposals, DposProposal, ProposalEvidence};
use log::warn;

use crate::arbitrators::ArbitratorSet;
use crate::config::DposConfig;
use crate::error::{EvidenceError, EvidenceResult};
use crate::ordering::{compare_proposal_evidence, is_canonical};

/// Proposal sanity and context: sponsor membership, view offset bound, and
/// the sponsor's signature over the proposal data.
pub fn check_proposal(
    proposal: &DposProposal,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    if !arbitrators.is_arbitrator(&proposal.sponsor) {
        return Err(EvidenceError::InvalidProposal(
            "sponsor is not a current arbitrator".to_string(),
        ));
    }
    if proposal.view_offset > config.max_view_offset {
        return Err(EvidenceError::InvalidProposal(format!(
            "view offset {} exceeds {}",
            proposal.view_offset, config.max_view_offset
        )));
    }
    if !proposal.verify_signature() {
        return Err(EvidenceError::InvalidProposal(
            "sponsor signature does not verify".to_string(),
        ));
    }
    Ok(())
}

/// Validate a single proposal evidence and return its decoded header.
pub fn validate_proposal_evidence(
    evidence: &ProposalEvidence,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<BlockHeader> {
    let header = BlockHeader::from_bytes(&evidence.block_header)
        .map_err(|e| EvidenceError::MalformedHeader(e.to_string()))?;

    if evidence.block_height != header.height {
        return Err(EvidenceError::HeightMismatch);
    }
    if evidence.proposal.block_hash != header.hash() {
        return Err(EvidenceError::ProposalBlockMismatch);
    }
    check_proposal(&evidence.proposal, arbitrators, config)?;
    Ok(header)
}

/// Validate an accusation that one sponsor proposed two different blocks in
/// the same view at the same height.
pub fn check_dpos_illegal_proposals(
    accusation: &DposIllegalProposals,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let result = check_illegal_proposals_inner(accusation, arbitrators, config);
    if let Err(ref e) = result {
        warn!("Rejected illegal proposals accusation: {}", e);
    }
    result
}

fn check_illegal_proposals_inner(
    accusation: &DposIllegalProposals,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let (evidence, compare) = (&accusation.evidence, &accusation.compare_evidence);

    if evidence.proposal.hash() == compare.proposal.hash() {
        return Err(EvidenceError::SameProposal);
    }

    validate_proposal_evidence(evidence, arbitrators, config)?;
    validate_proposal_evidence(compare, arbitrators, config)?;

    if evidence.block_height != compare.block_height {
        return Err(EvidenceError::HeightMismatch);
    }
    if !is_canonical(compare_proposal_evidence(evidence, compare)) {
        return Err(EvidenceError::OrderError);
    }
    if evidence.proposal.sponsor != compare.proposal.sponsor {
        return Err(EvidenceError::SponsorMismatch);
    }
    if evidence.proposal.view_offset != compare.proposal.view_offset {
        return Err(EvidenceError::ViewMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn setup() -> (Vec<Arbitrator>, ArbitratorSet, DposConfig) {
        init_logger();
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        (arbs, set, DposConfig::default())
    }

    fn accusation(a: ProposalEvidence, b: ProposalEvidence) -> DposIllegalProposals {
        let (evidence, compare_evidence) = ordered(a, b, compare_proposal_evidence);
        DposIllegalProposals { evidence, compare_evidence }
    }

    #[test]
    fn test_valid_double_proposal() {
        let (arbs, set, config) = setup();
        let acc = accusation(
            proposal_evidence(&arbs[0], 100, 1, 0),
            proposal_evidence(&arbs[0], 100, 2, 0),
        );
        assert_eq!(check_dpos_illegal_proposals(&acc, &set, &config), Ok(()));

        let swapped = DposIllegalProposals {
            evidence: acc.compare_evidence.clone(),
            compare_evidence: acc.evidence.clone(),
        };
        assert_eq!(
            check_dpos_illegal_proposals(&swapped, &set, &config),
            Err(EvidenceError::OrderError)
        );
    }

    #[test]
    fn test_identical_evidence_is_same_proposal() {
        let (arbs, set, config) = setup();
        let e = proposal_evidence(&arbs[0], 100, 1, 0);
        let acc = DposIllegalProposals { evidence: e.clone(), compare_evidence: e };
        assert_eq!(
            check_dpos_illegal_proposals(&acc, &set, &config),
            Err(EvidenceError::SameProposal)
        );
    }

    #[test]
    fn test_height_and_view_mismatch() {
        let (arbs, set, config) = setup();
        let acc = accusation(
            proposal_evidence(&arbs[0], 100, 1, 0),
            proposal_evidence(&arbs[0], 101, 2, 0),
        );
        assert_eq!(
            check_dpos_illegal_proposals(&acc, &set, &config),
            Err(EvidenceError::HeightMismatch)
        );

        let acc = accusation(
            proposal_evidence(&arbs[0], 100, 1, 0),
            proposal_evidence(&arbs[0], 100, 2, 1),
        );
        assert_eq!(
            check_dpos_illegal_proposals(&acc, &set, &config),
            Err(EvidenceError::ViewMismatch)
        );
    }

    #[test]
    fn test_different_sponsors_are_not_a_fault() {
        let (arbs, set, config) = setup();
        let acc = accusation(
            proposal_evidence(&arbs[0], 100, 1, 0),
            proposal_evidence(&arbs[1], 100, 2, 0),
        );
        assert_eq!(
            check_dpos_illegal_proposals(&acc, &set, &config),
            Err(EvidenceError::SponsorMismatch)
        );
    }

    #[test]
    fn test_same_proposal_with_different_header_bytes() {
        let (arbs, set, config) = setup();
        let a = proposal_evidence(&arbs[0], 100, 1, 0);
        let mut b = a.clone();
        // differs only in an aux-pow field, so the header hash is unchanged
        let mut header = BlockHeader::from_bytes(&b.block_header).unwrap();
        header.aux_pow.parent_coinbase = vec![9];
        b.block_header = header.to_bytes().unwrap();

        for acc in [
            DposIllegalProposals { evidence: a.clone(), compare_evidence: b.clone() },
            DposIllegalProposals { evidence: b, compare_evidence: a },
        ] {
            assert_eq!(
                check_dpos_illegal_proposals(&acc, &set, &config),
                Err(EvidenceError::SameProposal)
            );
        }
    }

    #[test]
    fn test_validate_proposal_evidence_errors() {
        let (arbs, set, config) = setup();
        let good = proposal_evidence(&arbs[0], 100, 1, 0);

        let mut bad_header = good.clone();
        bad_header.block_header = vec![1, 2, 3];
        assert!(matches!(
            validate_proposal_evidence(&bad_header, &set, &config),
            Err(EvidenceError::MalformedHeader(_))
        ));

        let mut bad_height = good.clone();
        bad_height.block_height = 99;
        assert_eq!(
            validate_proposal_evidence(&bad_height, &set, &config),
            Err(EvidenceError::HeightMismatch)
        );

        let other = proposal_evidence(&arbs[0], 100, 2, 0);
        let mut bad_link = good.clone();
        bad_link.block_header = other.block_header;
        assert_eq!(
            validate_proposal_evidence(&bad_link, &set, &config),
            Err(EvidenceError::ProposalBlockMismatch)
        );

        let mut bad_sig = good.clone();
        bad_sig.proposal.sign[10] ^= 0xff;
        assert!(matches!(
            validate_proposal_evidence(&bad_sig, &set, &config),
            Err(EvidenceError::InvalidProposal(_))
        ));

        let outsider = arbitrators(1).remove(0);
        assert!(matches!(
            validate_proposal_evidence(&proposal_evidence(&outsider, 100, 1, 0), &set, &config),
            Err(EvidenceError::InvalidProposal(_))
        ));

        let strict = DposConfig::new(5_000, 1, 3).unwrap();
        assert!(matches!(
            validate_proposal_evidence(&proposal_evidence(&arbs[0], 100, 1, 4), &set, &strict),
            Err(EvidenceError::InvalidProposal(_))
        ));
    }
}
