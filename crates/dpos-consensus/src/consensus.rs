// DPoS round driver: view changes, duty rotation and round snapshots
//
// SAFETY INVARIANTS:
// 1. Mutations are serialized behind a single write lock; accessors take the read lock
// 2. The on-duty arbitrator is (duty_changed_count + view_offset) mod N over one snapshot
// 3. A view change only happens on timeout while Running, or on explicit request
// 4. Exporting then importing a status restores the exact round position
// 5. The view listener is notified after the lock is released

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use dpos_core::Block;
use dpos_crypto::Uint256;

use crate::arbitrators::ArbitratorSetProvider;
use crate::config::DposConfig;
use crate::view::{View, ViewListener};

/// Round driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Waiting for a block to start consensus on
    Ready,
    /// Collecting proposals and votes for the cached block
    Running,
}

/// Persisted round position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusStatus {
    pub status: RoundState,
    pub view_offset: u32,
    pub view_start_time: DateTime<Utc>,
}

/// Candidate blocks for the current round, keyed by hash.
#[derive(Debug, Default)]
pub struct BlockCache {
    blocks: HashMap<Uint256, Block>,
}

impl BlockCache {
    pub fn insert(&mut self, block: Block) {
        self.blocks.insert(block.hash(), block);
    }

    pub fn get(&self, hash: &Uint256) -> Option<&Block> {
        self.blocks.get(hash)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

struct ConsensusState {
    status: RoundState,
    view: View,
    is_on_duty: bool,
    block_cache: BlockCache,
}

/// View-change state machine for one local arbitrator.
pub struct Consensus<P: ArbitratorSetProvider> {
    public_key: Vec<u8>,
    provider: P,
    listener: Arc<dyn ViewListener>,
    state: RwLock<ConsensusState>,
}

impl<P: ArbitratorSetProvider> Consensus<P> {
    /// Create a round driver in the `Ready` state at view offset 0.
    ///
    /// # Arguments
    /// * `public_key` - The local arbitrator's key, used for the on-duty flag
    /// * `provider` - Source of arbitrator snapshots
    /// * `config` - Supplies the sign tolerance
    /// * `listener` - Notified after every view change
    pub fn new(
        public_key: Vec<u8>,
        provider: P,
        config: &DposConfig,
        listener: Arc<dyn ViewListener>,
    ) -> Self {
        Consensus {
            public_key,
            provider,
            listener,
            state: RwLock::new(ConsensusState {
                status: RoundState::Ready,
                view: View::new(config.sign_tolerance(), Utc::now()),
                is_on_duty: false,
                block_cache: BlockCache::default(),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.read().status == RoundState::Running
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().status == RoundState::Ready
    }

    pub fn set_running(&self) {
        self.set_status(RoundState::Running, Utc::now());
    }

    pub fn set_ready(&self) {
        self.set_status(RoundState::Ready, Utc::now());
    }

    fn set_status(&self, status: RoundState, now: DateTime<Utc>) {
        let mut state = self.state.write();
        state.status = status;
        state.view.reset(now);
        debug!("Consensus status set to {:?}", status);
    }

    pub fn is_on_duty(&self) -> bool {
        self.state.read().is_on_duty
    }

    pub fn set_on_duty(&self, on_duty: bool) {
        self.state.write().is_on_duty = on_duty;
    }

    pub fn get_view_offset(&self) -> u32 {
        self.state.read().view.view_offset()
    }

    pub fn start_consensus(&self, block: Block) {
        self.start_consensus_at(block, Utc::now());
    }

    /// Begin a round on `block`: drop stale candidates, cache the block, and
    /// restart at view offset 0.
    pub fn start_consensus_at(&self, block: Block, now: DateTime<Utc>) {
        let height = block.height();
        let mut state = self.state.write();
        state.block_cache.clear();
        state.status = RoundState::Running;
        state.block_cache.insert(block);
        state.view.reset(now);
        info!("Consensus started at height {}", height);
    }

    /// Cache a candidate block without touching the round state.
    pub fn process_block(&self, block: Block) {
        self.state.write().block_cache.insert(block);
    }

    pub fn get_block(&self, hash: &Uint256) -> Option<Block> {
        self.state.read().block_cache.get(hash).cloned()
    }

    pub fn cached_block_count(&self) -> usize {
        self.state.read().block_cache.len()
    }

    pub fn change_view(&self) {
        self.change_view_at(Utc::now());
    }

    /// Advance to the next view unconditionally.
    pub fn change_view_at(&self, now: DateTime<Utc>) {
        let is_on_duty = {
            let mut state = self.state.write();
            self.advance_view(&mut state, now)
        };
        self.listener.on_view_changed(is_on_duty);
    }

    pub fn try_change_view(&self) -> bool {
        self.try_change_view_at(Utc::now())
    }

    /// Advance only when Running and the sign tolerance has elapsed.
    pub fn try_change_view_at(&self, now: DateTime<Utc>) -> bool {
        let is_on_duty = {
            let mut state = self.state.write();
            if state.status != RoundState::Running || !state.view.is_timed_out(now) {
                return false;
            }
            self.advance_view(&mut state, now)
        };
        self.listener.on_view_changed(is_on_duty);
        true
    }

    fn advance_view(&self, state: &mut ConsensusState, now: DateTime<Utc>) -> bool {
        state.view.advance(now);
        let offset = state.view.view_offset();
        let arbitrators = self.provider.snapshot();
        state.is_on_duty = arbitrators.on_duty(offset) == Some(self.public_key.as_slice());
        info!(
            "View changed to offset {}, on duty: {}",
            offset, state.is_on_duty
        );
        state.is_on_duty
    }

    pub fn get_on_duty_arbitrator(&self) -> Option<Vec<u8>> {
        let offset = self.get_view_offset();
        self.provider.snapshot().on_duty(offset).map(|k| k.to_vec())
    }

    pub fn is_arbitrator_on_duty(&self, public_key: &[u8]) -> bool {
        self.get_on_duty_arbitrator().as_deref() == Some(public_key)
    }

    pub fn collect_consensus_status(&self) -> ConsensusStatus {
        let state = self.state.read();
        ConsensusStatus {
            status: state.status,
            view_offset: state.view.view_offset(),
            view_start_time: state.view.view_start_time(),
        }
    }

    pub fn recover_from_consensus_status(&self, status: &ConsensusStatus) {
        let mut state = self.state.write();
        state.status = status.status;
        state.view.restore(status.view_offset, status.view_start_time);
        info!(
            "Recovered consensus status {:?} at view offset {}",
            status.status, status.view_offset
        );
    }
}
