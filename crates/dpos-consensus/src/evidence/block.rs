// Block-confirmation evidence
//
// SAFETY INVARIANTS:
// 1. Both confirms must independently carry a majority of valid accept votes
// 2. Each confirm must finalize exactly the header it travels with
// 3. The declared signer list must equal the confirm's vote signers as a set
// 4. The two headers must hash differently; encodings of one block are the same block

use std::collections::HashSet;

use dpos_core::{BlockEvidence, BlockHeader, Confirm, DposIllegalBlocks};
use log::warn;

use crate::arbitrators::ArbitratorSet;
use crate::config::DposConfig;
use crate::error::{EvidenceError, EvidenceResult};
use crate::evidence::proposal::check_proposal;
use crate::ordering::{compare_block_evidence, is_canonical};

/// Confirm context check: enough votes for a majority.
pub fn check_confirm_context(confirm: &Confirm, arbitrators: &ArbitratorSet) -> EvidenceResult<()> {
    let required = arbitrators.majority_threshold();
    if confirm.votes.len() < required {
        return Err(EvidenceError::InsufficientSigners {
            got: confirm.votes.len(),
            required,
        });
    }
    Ok(())
}

/// Confirm sanity check: the proposal is valid, and every vote is a signed
/// accept vote for that proposal from a distinct current arbitrator.
pub fn check_confirm_sanity(
    confirm: &Confirm,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    check_proposal(&confirm.proposal, arbitrators, config)
        .map_err(|e| EvidenceError::InvalidConfirm(e.to_string()))?;

    let proposal_hash = confirm.proposal.hash();
    let mut seen = HashSet::with_capacity(confirm.votes.len());
    for vote in &confirm.votes {
        if vote.proposal_hash != proposal_hash {
            return Err(EvidenceError::InvalidConfirm("vote references another proposal".to_string()));
        }
        if !vote.accept {
            return Err(EvidenceError::InvalidConfirm("confirm contains a reject vote".to_string()));
        }
        if !arbitrators.is_arbitrator(&vote.signer) {
            return Err(EvidenceError::InvalidConfirm("vote signer is not a current arbitrator".to_string()));
        }
        if !seen.insert(vote.signer.as_slice()) {
            return Err(EvidenceError::InvalidConfirm("duplicate vote signer".to_string()));
        }
        if !vote.verify_signature() {
            return Err(EvidenceError::InvalidConfirm("vote signature does not verify".to_string()));
        }
    }
    Ok(())
}

fn decode_evidence(evidence: &BlockEvidence, block_height: u32) -> EvidenceResult<(BlockHeader, Confirm)> {
    let header = BlockHeader::from_bytes(&evidence.header)
        .map_err(|e| EvidenceError::MalformedHeader(e.to_string()))?;
    if header.height != block_height {
        return Err(EvidenceError::HeightMismatch);
    }
    let confirm = Confirm::from_bytes(&evidence.block_confirm)
        .map_err(|e| EvidenceError::MalformedConfirm(e.to_string()))?;
    Ok((header, confirm))
}

fn signers_match(evidence: &BlockEvidence, confirm: &Confirm) -> bool {
    if evidence.signers.len() != confirm.votes.len() {
        return false;
    }
    let declared: HashSet<&[u8]> = evidence.signers.iter().map(|s| s.as_slice()).collect();
    let voted: HashSet<&[u8]> = confirm.signers().collect();
    declared == voted
}

/// Validate an accusation that two different blocks were confirmed at the
/// same height.
pub fn check_dpos_illegal_blocks(
    accusation: &DposIllegalBlocks,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let result = check_illegal_blocks_inner(accusation, arbitrators, config);
    if let Err(ref e) = result {
        warn!(
            "Rejected illegal blocks accusation at height {}: {}",
            accusation.block_height, e
        );
    }
    result
}

fn check_illegal_blocks_inner(
    accusation: &DposIllegalBlocks,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let (evidence, compare) = (&accusation.evidence, &accusation.compare_evidence);

    if !accusation.coin_type.is_known() {
        return Err(EvidenceError::UnknownCoinType(accusation.coin_type.0));
    }

    let (header, confirm) = decode_evidence(evidence, accusation.block_height)?;
    let (compare_header, compare_confirm) = decode_evidence(compare, accusation.block_height)?;

    // aux-pow is outside the block hash, so equal bytes are not required
    if header.hash() == compare_header.hash() {
        return Err(EvidenceError::SameBlock);
    }
    if !is_canonical(compare_block_evidence(evidence, compare)) {
        return Err(EvidenceError::OrderError);
    }

    for c in [&confirm, &compare_confirm] {
        check_confirm_context(c, arbitrators)?;
        check_confirm_sanity(c, arbitrators, config)?;
    }

    if confirm.proposal.view_offset == compare_confirm.proposal.view_offset {
        return Err(EvidenceError::ViewOffsetCollision);
    }

    if confirm.proposal.block_hash != header.hash()
        || compare_confirm.proposal.block_hash != compare_header.hash()
    {
        return Err(EvidenceError::BlockConfirmMismatch);
    }

    if !signers_match(evidence, &confirm) || !signers_match(compare, &compare_confirm) {
        return Err(EvidenceError::SignersMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dpos_core::CoinType;

    struct Fixture {
        arbs: Vec<Arbitrator>,
        set: ArbitratorSet,
        config: DposConfig,
    }

    fn fixture() -> Fixture {
        init_logger();
        let arbs = arbitrators(5);
        let set = set_of(&arbs, 0);
        Fixture { arbs, set, config: DposConfig::default() }
    }

    impl Fixture {
        fn evidence(&self, nonce: u32, sponsor: usize, voters: &[usize], view_offset: u32) -> BlockEvidence {
            let voters: Vec<&Arbitrator> = voters.iter().map(|i| &self.arbs[*i]).collect();
            block_evidence(20, nonce, &self.arbs[sponsor], &voters, view_offset)
        }

        fn accusation(&self, a: BlockEvidence, b: BlockEvidence) -> DposIllegalBlocks {
            let (evidence, compare_evidence) = ordered(a, b, compare_block_evidence);
            DposIllegalBlocks { coin_type: CoinType::ELA, block_height: 20, evidence, compare_evidence }
        }

        fn check(&self, acc: &DposIllegalBlocks) -> EvidenceResult<()> {
            check_dpos_illegal_blocks(acc, &self.set, &self.config)
        }
    }

    #[test]
    fn test_valid_conflicting_blocks() {
        let f = fixture();
        let acc = f.accusation(f.evidence(1, 0, &[0, 1, 2, 3], 0), f.evidence(2, 1, &[1, 2, 3, 4], 1));
        assert_eq!(f.check(&acc), Ok(()));

        let swapped = DposIllegalBlocks {
            evidence: acc.compare_evidence.clone(),
            compare_evidence: acc.evidence.clone(),
            ..acc
        };
        assert_eq!(f.check(&swapped), Err(EvidenceError::OrderError));
    }

    #[test]
    fn test_identical_blocks() {
        let f = fixture();
        let e = f.evidence(1, 0, &[0, 1, 2, 3], 0);
        let acc = DposIllegalBlocks {
            coin_type: CoinType::ELA,
            block_height: 20,
            evidence: e.clone(),
            compare_evidence: e,
        };
        assert_eq!(f.check(&acc), Err(EvidenceError::SameBlock));
    }

    #[test]
    fn test_aux_pow_variants_are_same_block() {
        let f = fixture();
        let plain = header(20, 1);
        let mut merged = plain.clone();
        merged.aux_pow.parent_coinbase = vec![9];
        assert_eq!(plain.hash(), merged.hash());

        let voters_a: Vec<&Arbitrator> = [0, 1, 2, 3].iter().map(|i| &f.arbs[*i]).collect();
        let voters_b: Vec<&Arbitrator> = [1, 2, 3, 4].iter().map(|i| &f.arbs[*i]).collect();
        let a = block_evidence_for(&plain, &f.arbs[0], &voters_a, 0);
        let b = block_evidence_for(&merged, &f.arbs[1], &voters_b, 1);
        assert_ne!(a, b);

        let acc = f.accusation(a, b);
        assert_eq!(f.check(&acc), Err(EvidenceError::SameBlock));

        let swapped = DposIllegalBlocks {
            evidence: acc.compare_evidence.clone(),
            compare_evidence: acc.evidence.clone(),
            ..acc
        };
        assert_eq!(f.check(&swapped), Err(EvidenceError::SameBlock));
    }

    #[test]
    fn test_unknown_coin_type() {
        let f = fixture();
        let mut acc = f.accusation(f.evidence(1, 0, &[0, 1, 2, 3], 0), f.evidence(2, 1, &[1, 2, 3, 4], 1));
        acc.coin_type = CoinType(7);
        assert_eq!(f.check(&acc), Err(EvidenceError::UnknownCoinType(7)));
    }

    #[test]
    fn test_height_mismatch() {
        let f = fixture();
        let mut acc = f.accusation(f.evidence(1, 0, &[0, 1, 2, 3], 0), f.evidence(2, 1, &[1, 2, 3, 4], 1));
        acc.block_height = 21;
        assert_eq!(f.check(&acc), Err(EvidenceError::HeightMismatch));
    }

    #[test]
    fn test_missing_confirm() {
        let f = fixture();
        let mut a = f.evidence(1, 0, &[0, 1, 2, 3], 0);
        a.block_confirm.clear();
        let acc = f.accusation(a, f.evidence(2, 1, &[1, 2, 3, 4], 1));
        assert!(matches!(f.check(&acc), Err(EvidenceError::MalformedConfirm(_))));
    }

    #[test]
    fn test_below_majority_is_insufficient() {
        let f = fixture();
        let acc = f.accusation(f.evidence(1, 0, &[0, 1, 2], 0), f.evidence(2, 1, &[1, 2, 3, 4], 1));
        assert_eq!(
            f.check(&acc),
            Err(EvidenceError::InsufficientSigners { got: 3, required: 4 })
        );
    }

    #[test]
    fn test_duplicate_voter_is_invalid_confirm() {
        let f = fixture();
        let acc = f.accusation(f.evidence(1, 0, &[0, 1, 2, 2], 0), f.evidence(2, 1, &[1, 2, 3, 4], 1));
        assert!(matches!(f.check(&acc), Err(EvidenceError::InvalidConfirm(_))));
    }

    #[test]
    fn test_same_view_offset_collides() {
        let f = fixture();
        let acc = f.accusation(f.evidence(1, 0, &[0, 1, 2, 3], 0), f.evidence(2, 0, &[1, 2, 3, 4], 0));
        assert_eq!(f.check(&acc), Err(EvidenceError::ViewOffsetCollision));
    }

    #[test]
    fn test_confirm_for_another_block() {
        let f = fixture();
        let a = f.evidence(1, 0, &[0, 1, 2, 3], 0);
        let mut b = f.evidence(2, 1, &[1, 2, 3, 4], 1);
        b.block_confirm = f.evidence(3, 1, &[1, 2, 3, 4], 1).block_confirm;
        let acc = f.accusation(a, b);
        assert_eq!(f.check(&acc), Err(EvidenceError::BlockConfirmMismatch));
    }

    #[test]
    fn test_declared_signers_must_match_votes() {
        let f = fixture();
        let a = f.evidence(1, 0, &[0, 1, 2, 3], 0);
        let mut b = f.evidence(2, 1, &[1, 2, 3, 4], 1);
        b.signers[0] = f.arbs[0].public_key.clone();
        let acc = f.accusation(a.clone(), b);
        assert_eq!(f.check(&acc), Err(EvidenceError::SignersMismatch));

        let mut c = f.evidence(2, 1, &[1, 2, 3, 4], 1);
        c.signers.pop();
        let acc = f.accusation(a, c);
        assert_eq!(f.check(&acc), Err(EvidenceError::SignersMismatch));
    }
}
