// Inactive-arbitrator accusations
//
// SAFETY INVARIANTS:
// 1. Only current arbitrators can sponsor or be accused
// 2. Council (CRC) members are never accusable, whatever the script says
// 3. The accusation must be authorized by a council multisig with a simple majority threshold

use std::collections::HashSet;

use dpos_core::InactiveArbitratorsTransaction;
use dpos_crypto::parse_multisig_redeem_script;
use log::{info, warn};

use crate::arbitrators::ArbitratorSet;
use crate::config::DposConfig;
use crate::error::{EvidenceError, EvidenceResult};

/// Threshold a council multisig must carry: floor(N * 0.5) + 1.
pub fn council_multisig_threshold(council_size: usize) -> usize {
    council_size / 2 + 1
}

pub fn check_inactive_arbitrators(
    tx: &InactiveArbitratorsTransaction,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let result = check_inactive_inner(tx, arbitrators, config);
    match result {
        Ok(()) => info!(
            "Accepted inactivity accusation against {} arbitrator(s) at height {}",
            tx.payload.arbitrators.len(),
            tx.payload.block_height
        ),
        Err(ref e) => warn!("Rejected inactivity accusation: {}", e),
    }
    result
}

fn check_inactive_inner(
    tx: &InactiveArbitratorsTransaction,
    arbitrators: &ArbitratorSet,
    config: &DposConfig,
) -> EvidenceResult<()> {
    let payload = &tx.payload;

    if !arbitrators.is_arbitrator(&payload.sponsor) {
        return Err(EvidenceError::UnknownSponsor);
    }
    if payload.arbitrators.len() > config.inactive_eliminate_count {
        return Err(EvidenceError::TooManyAccused {
            count: payload.arbitrators.len(),
            max: config.inactive_eliminate_count,
        });
    }
    if !payload.arbitrators.iter().all(|a| arbitrators.is_arbitrator(a)) {
        return Err(EvidenceError::UnknownAccused);
    }
    if payload.arbitrators.iter().any(|a| arbitrators.is_council(a)) {
        return Err(EvidenceError::CrcCannotBeAccused);
    }

    let program = tx
        .programs
        .first()
        .ok_or_else(|| EvidenceError::InvalidRedeemScript("missing program".to_string()))?;
    let script = parse_multisig_redeem_script(&program.code)
        .map_err(|e| EvidenceError::InvalidRedeemScript(e.to_string()))?;

    let council = arbitrators.council();
    if script.threshold != council_multisig_threshold(council.len())
        || script.public_keys.len() != council.len()
    {
        return Err(EvidenceError::InvalidMultisigKeys);
    }
    let script_keys: HashSet<&[u8]> = script.public_keys.iter().map(|k| k.as_slice()).collect();
    let council_keys: HashSet<&[u8]> = council.iter().map(|k| k.as_slice()).collect();
    if script_keys != council_keys {
        return Err(EvidenceError::InvalidMultisigKeys);
    }
    Ok(())
}
