use thiserror::Error;

/// Broad class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bytes that do not decode or fields outside their domain
    Structural,
    /// Height, view, sponsor or linkage disagreement between fields
    Mismatch,
    /// Duplicate evidence or evidences out of canonical order
    Ordering,
    /// Identities outside the arbitrator set, or too few of them
    Authorization,
    /// Signatures that do not verify
    Cryptographic,
}

/// Rejection reason for an accusation payload.
///
/// Every validator returns exactly one of these; none are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    // Structural
    #[error("Malformed block header: {0}")]
    MalformedHeader(String),

    #[error("Malformed confirm: {0}")]
    MalformedConfirm(String),

    #[error("Unknown coin type {0}")]
    UnknownCoinType(u8),

    #[error("Invalid illegal evidence type")]
    InvalidType,

    #[error("Illegal signer missing or malformed")]
    MissingOrMalformedSigner,

    #[error("Invalid genesis block address: {0}")]
    InvalidAddress(String),

    #[error("Invalid redeem script: {0}")]
    InvalidRedeemScript(String),

    #[error("Too many signs: {count} > {max}")]
    TooManySigns { count: usize, max: usize },

    // Mismatch
    #[error("Block height mismatch")]
    HeightMismatch,

    #[error("Proposal does not reference the evidence header")]
    ProposalBlockMismatch,

    #[error("Vote does not reference the evidence proposal")]
    VoteProposalMismatch,

    #[error("Sponsor mismatch")]
    SponsorMismatch,

    #[error("View offset mismatch")]
    ViewMismatch,

    #[error("Vote signer mismatch")]
    SignerMismatch,

    #[error("Confirm view offset should not be same")]
    ViewOffsetCollision,

    #[error("Confirm proposal does not reference the evidence header")]
    BlockConfirmMismatch,

    #[error("Evidence signers do not match confirm votes")]
    SignersMismatch,

    #[error("Multisig keys do not match the council")]
    InvalidMultisigKeys,

    // Ordering
    #[error("Evidence order error")]
    OrderError,

    #[error("Proposals cannot be same")]
    SameProposal,

    #[error("Votes cannot be same")]
    SameVote,

    #[error("Blocks cannot be same")]
    SameBlock,

    #[error("Sidechain evidence data cannot be same")]
    SameData,

    // Authorization
    #[error("Illegal signer is not a current arbitrator")]
    UnknownSigner,

    #[error("Sponsor is not a current arbitrator")]
    UnknownSponsor,

    #[error("Accused is not a current arbitrator")]
    UnknownAccused,

    #[error("CRC arbitrator cannot be accused of inactivity")]
    CrcCannotBeAccused,

    #[error("Too many accused arbitrators: {count} > {max}")]
    TooManyAccused { count: usize, max: usize },

    #[error("Insufficient confirm signers: {got} < {required}")]
    InsufficientSigners { got: usize, required: usize },

    #[error("Insufficient valid signs: {got} < {required}")]
    InsufficientSigns { got: usize, required: usize },

    // Cryptographic
    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Invalid vote signature")]
    InvalidVoteSignature,

    #[error("Invalid confirm: {0}")]
    InvalidConfirm(String),
}

impl EvidenceError {
    pub fn category(&self) -> ErrorCategory {
        use EvidenceError::*;
        match self {
            MalformedHeader(_) | MalformedConfirm(_) | UnknownCoinType(_) | InvalidType
            | MissingOrMalformedSigner | InvalidAddress(_) | InvalidRedeemScript(_)
            | TooManySigns { .. } => {
                ErrorCategory::Structural
            }
            HeightMismatch | ProposalBlockMismatch | VoteProposalMismatch | SponsorMismatch
            | ViewMismatch | SignerMismatch | ViewOffsetCollision | BlockConfirmMismatch
            | SignersMismatch | InvalidMultisigKeys => ErrorCategory::Mismatch,
            OrderError | SameProposal | SameVote | SameBlock | SameData => ErrorCategory::Ordering,
            UnknownSigner | UnknownSponsor | UnknownAccused | CrcCannotBeAccused
            | TooManyAccused { .. } | InsufficientSigners { .. } | InsufficientSigns { .. } => {
                ErrorCategory::Authorization
            }
            InvalidProposal(_) | InvalidVoteSignature | InvalidConfirm(_) => {
                ErrorCategory::Cryptographic
            }
        }
    }
}

pub type EvidenceResult<T> = Result<T, EvidenceError>;
