// DPoS accountability layer: Byzantine evidence validation and the
// view-change state machine.

pub mod arbitrators;
pub mod config;
pub mod consensus;
pub mod error;
pub mod evidence;
pub mod ordering;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use arbitrators::{ArbitratorRegistry, ArbitratorSet, ArbitratorSetProvider};
pub use config::DposConfig;
pub use consensus::{BlockCache, Consensus, ConsensusStatus, RoundState};
pub use error::{ErrorCategory, EvidenceError, EvidenceResult};
pub use evidence::EvidenceValidator;
pub use view::{NoopViewListener, View, ViewListener};
