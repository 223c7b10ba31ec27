//! BlockOracle: the host-supplied source of recent block identities that
//! base-block freshness checks against.

use orgchart_primitives::B256;
use std::collections::VecDeque;

/// A source of recent block identities. The blockchain host implements this
/// over its own chain state; [`InMemoryBlockOracle`] is a minimal standalone
/// implementation for tests and simulator hosts.
pub trait BlockOracle {
    /// The current chain height (or logical clock tick, for non-blockchain hosts).
    fn current_height(&self) -> u64;

    /// The hash of the block at `height`, or `None` if it has aged out of
    /// whatever window this oracle retains.
    fn block_hash(&self, height: u64) -> Option<B256>;
}

/// A bounded ring buffer retaining the minimum a conforming host must keep:
/// `LOOK_BACK_LENGTH + 1` most-recent block hashes.
#[derive(Debug, Clone)]
pub struct InMemoryBlockOracle {
    capacity: usize,
    current_height: u64,
    hashes: VecDeque<B256>,
}

impl InMemoryBlockOracle {
    /// Create an oracle retaining `capacity` most-recent hashes. The caller
    /// is expected to pass `LOOK_BACK_LENGTH + 1` (see [`crate::types::LOOK_BACK_LENGTH`]).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            current_height: 0,
            hashes: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Record a new block at the next height, evicting the oldest hash if
    /// the ring buffer is full.
    pub fn push_block(&mut self, hash: B256) {
        if self.hashes.len() == self.capacity {
            self.hashes.pop_front();
        }
        self.hashes.push_back(hash);
        self.current_height += 1;
    }

    /// The height of the oldest hash still retained.
    fn oldest_retained_height(&self) -> u64 {
        self.current_height - self.hashes.len() as u64
    }
}

impl BlockOracle for InMemoryBlockOracle {
    fn current_height(&self) -> u64 {
        self.current_height
    }

    fn block_hash(&self, height: u64) -> Option<B256> {
        if height == 0 || height > self.current_height {
            return None;
        }
        let oldest = self.oldest_retained_height();
        if height <= oldest {
            return None;
        }
        let offset = (height - oldest - 1) as usize;
        self.hashes.get(offset).copied()
    }
}
