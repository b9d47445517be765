//! ECDSA signature primitive over secp256k1.
//!
//! Arbitrator identities are 33-byte compressed SEC1 public keys. Messages
//! are hashed with SHA-256 before signing; signatures are the 64-byte
//! fixed-width `r || s` encoding with low-S normalization.
//!
//! SAFETY GUARANTEES:
//! - Signing is deterministic (RFC 6979), so re-signing the same data yields the same bytes
//! - Verification never panics on malformed input
//! - Explicit error propagation (no panics)

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use log::debug;

use crate::{CryptoError, CryptoResult};

pub const PUBLIC_KEY_SIZE: usize = 33;
pub const PRIVATE_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Decode a compressed public key into a curve point.
pub fn decode_point(public_key: &[u8]) -> CryptoResult<VerifyingKey> {
    if public_key.len() != PUBLIC_KEY_SIZE {
        return Err(CryptoError::InvalidKeyFormat(format!(
            "public key must be {} bytes, got {}",
            PUBLIC_KEY_SIZE,
            public_key.len()
        )));
    }
    VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| CryptoError::InvalidKeyFormat("not a point on secp256k1".to_string()))
}

/// Encode a curve point as a compressed public key.
pub fn encode_point(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(true).as_bytes().to_vec()
}

/// ECDSA signature system
pub struct SignatureScheme;

impl SignatureScheme {
    /// Generate a keypair. Returns (private_key, compressed_public_key).
    pub fn keygen() -> (Vec<u8>, Vec<u8>) {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        let public_key = encode_point(signing_key.verifying_key());
        (signing_key.to_bytes().to_vec(), public_key)
    }

    /// Derive the compressed public key for a private key.
    pub fn public_key(private_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let signing_key = Self::signing_key(private_key)?;
        Ok(encode_point(signing_key.verifying_key()))
    }

    /// Sign a message
    pub fn sign(private_key: &[u8], message: &[u8]) -> CryptoResult<Vec<u8>> {
        let signing_key = Self::signing_key(private_key)?;
        let signature: Signature = signing_key
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }

    /// Verify a signature, reporting why it failed.
    pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> CryptoResult<()> {
        let key = decode_point(public_key)?;

        if signature.len() != SIGNATURE_SIZE {
            return Err(CryptoError::InvalidSignatureFormat(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                signature.len()
            )));
        }
        let signature = Signature::from_slice(signature)
            .map_err(|_| CryptoError::InvalidSignatureFormat("invalid r or s".to_string()))?;

        key.verify(message, &signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed("signature does not match".to_string()))
    }

    /// Verify a signature.
    pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match Self::verify_signature(public_key, message, signature) {
            Ok(()) => true,
            Err(e) => {
                debug!("signature rejected: {}", e);
                false
            }
        }
    }

    fn signing_key(private_key: &[u8]) -> CryptoResult<SigningKey> {
        if private_key.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyFormat(format!(
                "private key must be {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                private_key.len()
            )));
        }
        SigningKey::from_slice(private_key)
            .map_err(|_| CryptoError::InvalidKeyFormat("private key out of range".to_string()))
    }
}
