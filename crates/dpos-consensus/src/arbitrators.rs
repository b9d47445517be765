// Arbitrator set snapshots and majority math
//
// SAFETY INVARIANTS:
// 1. A snapshot is immutable; rotation installs a new snapshot atomically
// 2. One validation call reads exactly one snapshot (no torn reads across a rotation)
// 3. Majority: n signatures form a majority iff n > floor(2N/3)
// 4. The on-duty arbitrator is a pure function of (duty_changed_count, view_offset)

use std::collections::HashSet;
use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

/// Point-in-time view of the arbitrators for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitratorSet {
    current: Vec<Vec<u8>>,
    council: Vec<Vec<u8>>,
    duty_changed_count: u32,
    majority_count: usize,
}

impl ArbitratorSet {
    /// Create a snapshot.
    ///
    /// # Arguments
    /// * `current` - Ordered arbitrator public keys; order defines duty rotation
    /// * `council` - Council (CRC) member keys; these can never be accused of inactivity
    pub fn new(current: Vec<Vec<u8>>, council: Vec<Vec<u8>>) -> Result<Self, String> {
        if has_duplicates(&current) {
            return Err("duplicate key in current arbitrators".to_string());
        }
        if has_duplicates(&council) {
            return Err("duplicate key in council arbitrators".to_string());
        }
        let majority_count = current.len() * 2 / 3;
        Ok(ArbitratorSet {
            current,
            council,
            duty_changed_count: 0,
            majority_count,
        })
    }

    pub fn with_duty_changed_count(mut self, duty_changed_count: u32) -> Self {
        self.duty_changed_count = duty_changed_count;
        self
    }

    pub fn current(&self) -> &[Vec<u8>] {
        &self.current
    }

    pub fn council(&self) -> &[Vec<u8>] {
        &self.council
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn duty_changed_count(&self) -> u32 {
        self.duty_changed_count
    }

    pub fn is_arbitrator(&self, public_key: &[u8]) -> bool {
        self.current.iter().any(|k| k.as_slice() == public_key)
    }

    pub fn is_council(&self, public_key: &[u8]) -> bool {
        self.council.iter().any(|k| k.as_slice() == public_key)
    }

    /// floor(2N/3): the largest count that is NOT a majority.
    pub fn majority_count(&self) -> usize {
        self.majority_count
    }

    /// Smallest count that is a majority (use with `>=`).
    pub fn majority_threshold(&self) -> usize {
        self.majority_count + 1
    }

    pub fn has_majority(&self, n: usize) -> bool {
        n > self.majority_count
    }

    /// Arbitrator on duty at `view_offset`, or `None` for an empty set.
    pub fn on_duty(&self, view_offset: u32) -> Option<&[u8]> {
        if self.current.is_empty() {
            return None;
        }
        let n = self.current.len() as u64;
        let index = (self.duty_changed_count as u64 + view_offset as u64) % n;
        self.current.get(index as usize).map(|k| k.as_slice())
    }
}

fn has_duplicates(keys: &[Vec<u8>]) -> bool {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter().any(|k| !seen.insert(k.as_slice()))
}

/// Source of arbitrator snapshots.
pub trait ArbitratorSetProvider: Send + Sync {
    fn snapshot(&self) -> Arc<ArbitratorSet>;
}

impl<T: ArbitratorSetProvider + ?Sized> ArbitratorSetProvider for Arc<T> {
    fn snapshot(&self) -> Arc<ArbitratorSet> {
        (**self).snapshot()
    }
}

/// Production provider: holds the live snapshot and swaps it at round
/// boundaries.
#[derive(Debug)]
pub struct ArbitratorRegistry {
    inner: RwLock<Arc<ArbitratorSet>>,
}

impl ArbitratorRegistry {
    pub fn new(initial: ArbitratorSet) -> Self {
        ArbitratorRegistry {
            inner: RwLock::new(Arc::new(initial)),
        }
    }

    /// Install the snapshot for the next round.
    pub fn rotate(&self, next: ArbitratorSet) {
        info!(
            "Arbitrator set rotated: {} arbitrators, {} council, duty_changed_count={}",
            next.len(),
            next.council.len(),
            next.duty_changed_count
        );
        *self.inner.write() = Arc::new(next);
    }
}

impl ArbitratorSetProvider for ArbitratorRegistry {
    fn snapshot(&self) -> Arc<ArbitratorSet> {
        self.inner.read().clone()
    }
}
