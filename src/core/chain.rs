//! Canonical chain of sealed blocks
//!
//! A chain is an ordered sequence of sealed blocks starting at the genesis
//! block. For the canonical chain the vector index equals the block height,
//! which the reorg and reconciliation code relies on.

use crate::core::block::Block;
use serde::{Deserialize, Serialize};

/// An ordered, hash-linked sequence of sealed blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding only the genesis block
    pub fn genesis() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// The last block of the chain
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Check the hash links and height progression of the whole chain
    pub fn is_valid(&self) -> bool {
        for i in 1..self.blocks.len() {
            let current = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if current.height() != previous.height() + 1 {
                return false;
            }
            if previous.hash() != Some(current.previous_hash()) {
                return false;
            }
        }
        true
    }

    /// Append a sealed block (link validation is the ledger's job)
    pub(crate) fn push(&mut self, block: Block) {
        debug_assert!(block.is_sealed());
        self.blocks.push(block);
    }

    /// Remove and return the suffix of blocks at `height` and above
    pub(crate) fn split_off_from(&mut self, height: u64) -> Vec<Block> {
        let at = (height as usize).min(self.blocks.len());
        self.blocks.split_off(at)
    }

    /// Append a run of sealed blocks (used when adopting a fork)
    pub(crate) fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::genesis()
    }
}
