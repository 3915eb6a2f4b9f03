//! Divergent branches of the canonical chain
//!
//! When a valid block arrives whose parent is not the canonical tip, it is
//! filed into an extension: a branch `[base, b1, b2, ...]` rooted at a block
//! of the canonical chain. The fork set keeps every extension ever created;
//! losing branches are never pruned (reference policy, left open).

use crate::core::block::Block;
use serde::{Deserialize, Serialize};

/// A divergent branch rooted at a block of the canonical chain
///
/// The first element is the fork base; any following blocks form the
/// divergent tail. After a reorg an extension may consist of the base alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    blocks: Vec<Block>,
}

impl Extension {
    fn new(base: Block, block: Block) -> Self {
        Self {
            blocks: vec![base, block],
        }
    }

    /// Build an extension from an already-linked run of blocks
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        debug_assert!(!blocks.is_empty());
        Self { blocks }
    }

    /// The block of the canonical chain this branch forked from
    pub fn base(&self) -> &Block {
        &self.blocks[0]
    }

    /// The last block of the branch
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("extensions hold at least their fork base")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// The set of all known divergent branches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkSet {
    extensions: Vec<Extension>,
}

impl ForkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a block under the branch ending in `base`
    ///
    /// If some extension's tip equals `base` the block continues that branch;
    /// otherwise a new extension `[base, block]` is created. Extensions of
    /// extensions arise naturally this way.
    pub(crate) fn file(&mut self, base: &Block, block: Block) {
        for ext in &mut self.extensions {
            if ext.tip() == base {
                ext.blocks.push(block);
                return;
            }
        }
        self.extensions.push(Extension::new(base.clone(), block));
    }

    /// Store an orphaned canonical suffix as a new extension
    pub(crate) fn adopt_orphaned(&mut self, blocks: Vec<Block>) {
        if !blocks.is_empty() {
            self.extensions.push(Extension::from_blocks(blocks));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
