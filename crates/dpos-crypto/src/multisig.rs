//! M-of-N multisig redeem scripts.
//!
//! Layout: `PUSH_M || (0x21 || pubkey33) * N || PUSH_N || CHECKMULTISIG`,
//! where `PUSH_k` is the single opcode `0x50 + k`.
//!
//! SAFETY INVARIANTS:
//! 1. Public keys are sorted before encoding, so the same key set always yields the same script
//! 2. Parsing rejects every script that `create_multisig_redeem_script` could not have produced,
//!    including unsorted or repeated keys
//! 3. Every embedded key is a valid compressed secp256k1 point

use std::cmp::Ordering;

use crate::signature::{decode_point, PUBLIC_KEY_SIZE};
use crate::{CryptoError, CryptoResult};

const OP_PUSH_BASE: u8 = 0x50;
const OP_PUSH_PUBKEY: u8 = PUBLIC_KEY_SIZE as u8;
const OP_CHECKMULTISIG: u8 = 0xAE;

/// Largest N expressible with a single push opcode.
pub const MAX_MULTISIG_KEYS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigScript {
    pub threshold: usize,
    pub public_keys: Vec<Vec<u8>>,
}

/// Order keys by X coordinate, then by the parity prefix.
fn compare_public_keys(a: &[u8], b: &[u8]) -> Ordering {
    a[1..].cmp(&b[1..]).then(a[0].cmp(&b[0]))
}

/// Build the redeem script for `threshold`-of-`public_keys.len()`.
pub fn create_multisig_redeem_script(threshold: usize, public_keys: &[Vec<u8>]) -> CryptoResult<Vec<u8>> {
    let n = public_keys.len();
    if n == 0 || n > MAX_MULTISIG_KEYS {
        return Err(CryptoError::InvalidScript(format!(
            "key count {} outside 1..={}",
            n, MAX_MULTISIG_KEYS
        )));
    }
    if threshold == 0 || threshold > n {
        return Err(CryptoError::InvalidScript(format!(
            "threshold {} outside 1..={}",
            threshold, n
        )));
    }
    for key in public_keys {
        decode_point(key)?;
    }

    let mut sorted: Vec<&Vec<u8>> = public_keys.iter().collect();
    sorted.sort_by(|a, b| compare_public_keys(a, b));
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(CryptoError::InvalidScript("duplicate public key".to_string()));
    }

    let mut script = Vec::with_capacity(3 + n * (PUBLIC_KEY_SIZE + 1));
    script.push(OP_PUSH_BASE + threshold as u8);
    for key in sorted {
        script.push(OP_PUSH_PUBKEY);
        script.extend_from_slice(key);
    }
    script.push(OP_PUSH_BASE + n as u8);
    script.push(OP_CHECKMULTISIG);
    Ok(script)
}

/// Decode a multisig redeem script into its threshold and keys.
pub fn parse_multisig_redeem_script(script: &[u8]) -> CryptoResult<MultisigScript> {
    let invalid = |msg: &str| CryptoError::InvalidScript(msg.to_string());

    if script.len() < 3 + PUBLIC_KEY_SIZE + 1 {
        return Err(invalid("script too short"));
    }
    if script[script.len() - 1] != OP_CHECKMULTISIG {
        return Err(invalid("missing CHECKMULTISIG"));
    }

    let threshold = push_value(script[0]).ok_or_else(|| invalid("bad threshold opcode"))?;
    let n = push_value(script[script.len() - 2]).ok_or_else(|| invalid("bad key count opcode"))?;
    if threshold > n {
        return Err(invalid("threshold exceeds key count"));
    }

    let body = &script[1..script.len() - 2];
    if body.len() != n * (PUBLIC_KEY_SIZE + 1) {
        return Err(invalid("key section length does not match key count"));
    }

    let mut public_keys: Vec<Vec<u8>> = Vec::with_capacity(n);
    for chunk in body.chunks(PUBLIC_KEY_SIZE + 1) {
        if chunk[0] != OP_PUSH_PUBKEY {
            return Err(invalid("expected 33-byte key push"));
        }
        let key = &chunk[1..];
        decode_point(key)?;
        if let Some(prev) = public_keys.last() {
            if compare_public_keys(prev, key) != Ordering::Less {
                return Err(invalid("keys not strictly sorted"));
            }
        }
        public_keys.push(key.to_vec());
    }

    Ok(MultisigScript { threshold, public_keys })
}

fn push_value(opcode: u8) -> Option<usize> {
    if opcode > OP_PUSH_BASE && opcode <= OP_PUSH_BASE + MAX_MULTISIG_KEYS as u8 {
        Some((opcode - OP_PUSH_BASE) as usize)
    } else {
        None
    }
}
