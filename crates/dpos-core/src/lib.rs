pub mod block;
pub mod codec;
pub mod dpos;
pub mod error;
pub mod payload;

pub use block::{AuxPow, Block, BlockHeader, BtcHeader};
pub use dpos::{Confirm, DposProposal, DposProposalVote};
pub use error::{CoreError, CoreResult};
pub use payload::{
    BlockEvidence, CoinType, DposIllegalBlocks, DposIllegalProposals, DposIllegalVotes,
    IllegalDataType, InactiveArbitrators, InactiveArbitratorsTransaction, Program,
    ProposalEvidence, SidechainIllegalData, SidechainIllegalEvidence, VoteEvidence,
};
