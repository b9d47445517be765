use std::collections::HashSet;

use dpos_core::SidechainIllegalData;
use dpos_crypto::signature::decode_point;
use dpos_crypto::{program_hash_from_address, SignatureScheme};
use log::{debug, warn};

use crate::arbitrators::ArbitratorSet;
use crate::error::{EvidenceError, EvidenceResult};
use crate::ordering::{compare_sidechain_evidence, is_canonical};

/// Count signatures over `data` that verify against distinct arbitrators.
///
/// Costs up to `signs.len() * arbitrators.len()` verifications; callers
/// bound `signs` by the set size first.
///
/// A signature is matched to the first not-yet-used arbitrator whose key
/// verifies it, so one arbitrator can never be counted twice.
pub fn count_arbitrator_signatures(data: &[u8], signs: &[Vec<u8>], arbitrators: &ArbitratorSet) -> usize {
    let mut used: HashSet<&[u8]> = HashSet::new();
    for sign in signs {
        let signer = arbitrators
            .current()
            .iter()
            .map(|k| k.as_slice())
            .find(|k| !used.contains(k) && SignatureScheme::verify(k, data, sign));
        match signer {
            Some(k) => {
                used.insert(k);
            }
            None => debug!("sidechain sign matches no unused arbitrator"),
        }
    }
    used.len()
}

/// Validate an arbitrator-signed report of a sidechain fault.
pub fn check_sidechain_illegal_evidence(
    data: &SidechainIllegalData,
    arbitrators: &ArbitratorSet,
) -> EvidenceResult<()> {
    let result = check_sidechain_inner(data, arbitrators);
    if let Err(ref e) = result {
        warn!(
            "Rejected sidechain {} accusation at height {}: {}",
            data.illegal_type.as_str(),
            data.height,
            e
        );
    }
    result
}

fn check_sidechain_inner(data: &SidechainIllegalData, arbitrators: &ArbitratorSet) -> EvidenceResult<()> {
    if !data.illegal_type.is_sidechain() {
        return Err(EvidenceError::InvalidType);
    }
    if data.illegal_signer.is_empty() || decode_point(&data.illegal_signer).is_err() {
        return Err(EvidenceError::MissingOrMalformedSigner);
    }
    if !arbitrators.is_arbitrator(&data.illegal_signer) {
        return Err(EvidenceError::UnknownSigner);
    }
    program_hash_from_address(&data.genesis_block_address)
        .map_err(|e| EvidenceError::InvalidAddress(e.to_string()))?;

    if data.signs.len() > arbitrators.len() {
        return Err(EvidenceError::TooManySigns {
            count: data.signs.len(),
            max: arbitrators.len(),
        });
    }
    let required = arbitrators.majority_threshold();
    let got = count_arbitrator_signatures(&data.data(), &data.signs, arbitrators);
    if got < required {
        return Err(EvidenceError::InsufficientSigns { got, required });
    }

    if data.evidence.data_hash == data.compare_evidence.data_hash {
        return Err(EvidenceError::SameData);
    }
    if !is_canonical(compare_sidechain_evidence(&data.evidence, &data.compare_evidence)) {
        return Err(EvidenceError::OrderError);
    }
    Ok(())
}
