pub mod hash;
pub mod signature;
pub mod multisig;
pub mod address;

use std::fmt;

// ==================== ERROR TYPES ====================

/// Error type for cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key is not a valid compressed curve point
    InvalidKeyFormat(String),

    /// Signature bytes could not be parsed
    InvalidSignatureFormat(String),

    /// Signature parsed but did not verify
    SignatureVerificationFailed(String),

    /// Signing failed
    SigningFailed(String),

    /// Redeem script is not a well-formed multisig script
    InvalidScript(String),

    /// Address could not be decoded into a program hash
    InvalidAddress(String),

    /// Hex or fixed-length byte decoding failed
    InvalidLength { expected: usize, got: usize },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKeyFormat(msg) => write!(f, "Invalid key format: {}", msg),
            CryptoError::InvalidSignatureFormat(msg) => write!(f, "Invalid signature format: {}", msg),
            CryptoError::SignatureVerificationFailed(msg) => write!(f, "Signature verification failed: {}", msg),
            CryptoError::SigningFailed(msg) => write!(f, "Signing failed: {}", msg),
            CryptoError::InvalidScript(msg) => write!(f, "Invalid script: {}", msg),
            CryptoError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            CryptoError::InvalidLength { expected, got } => {
                write!(f, "Invalid length: expected {} bytes, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for CryptoError {}

pub type CryptoResult<T> = Result<T, CryptoError>;

pub use hash::{sha256d, Uint168, Uint256};
pub use signature::SignatureScheme;
pub use multisig::{create_multisig_redeem_script, parse_multisig_redeem_script, MultisigScript};
pub use address::{address_from_program_hash, program_hash_from_address};
