use dpos_crypto::CryptoError;
use thiserror::Error;

/// Errors raised while encoding, decoding or signing core messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

pub type CoreResult<T> = Result<T, CoreError>;
