//! Base58Check addresses.
//!
//! An address is the Base58Check encoding (4-byte double-SHA-256 checksum)
//! of a 21-byte program hash. Well-formed addresses are 34 characters long.

use crate::hash::{Uint168, UINT168_SIZE};
use crate::{CryptoError, CryptoResult};

pub const ADDRESS_LENGTH: usize = 34;

/// Decode an address into its program hash.
pub fn program_hash_from_address(address: &str) -> CryptoResult<Uint168> {
    if address.len() != ADDRESS_LENGTH {
        return Err(CryptoError::InvalidAddress(format!(
            "expected {} characters, got {}",
            ADDRESS_LENGTH,
            address.len()
        )));
    }
    let decoded = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
    if decoded.len() != UINT168_SIZE {
        return Err(CryptoError::InvalidAddress(format!(
            "payload is {} bytes, expected {}",
            decoded.len(),
            UINT168_SIZE
        )));
    }
    Uint168::from_bytes(&decoded)
}

pub fn address_from_program_hash(program_hash: &Uint168) -> String {
    bs58::encode(program_hash.as_bytes()).with_check().into_string()
}
