//! Ledger: one peer's complete chain state
//!
//! A ledger owns the canonical chain, the fork set of divergent branches and
//! the pool of pending transactions. It implements block admission, the
//! local fork-choice rule (internal consensus) and the pool reconciliation
//! that runs when a longer peer chain is adopted.

use crate::core::block::Block;
use crate::core::chain::Chain;
use crate::core::fork::ForkSet;
use crate::core::transaction::Transaction;
use crate::mining::pow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default proof-of-work difficulty (leading zero hex digits)
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Default maximum number of transactions per mined block
pub const DEFAULT_BLOCK_CAPACITY: usize = 3;

/// Default number of mining sprints per session
pub const DEFAULT_NUM_SPRINTS: u32 = 5;

/// Default length of one mining sprint in seconds
pub const DEFAULT_SPRINT_SECS: f64 = 10.0;

/// Global tunables shared by every ledger in a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunables {
    /// Number of leading zero hex digits a valid proof must have
    pub difficulty: usize,
    /// Maximum number of transactions per mined block
    pub block_capacity: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            block_capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }
}

/// Ledger-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("previous hash {got} does not match parent hash {expected}")]
    InvalidLink { expected: String, got: String },
    #[error("invalid proof of work")]
    InvalidProof,
    #[error("consensus chain not strictly longer: local {local}, remote {remote}")]
    ReconciliationPrecondition { local: usize, remote: usize },
}

/// One peer's chain, fork set and pending-transaction pool
///
/// `Clone` is a deep copy: no structure is shared between a ledger and its
/// clone, which is what peer joining and chain adoption rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    chain: Chain,
    extensions: ForkSet,
    pending: Vec<Transaction>,
    tunables: Tunables,
}

impl Ledger {
    /// Create a fresh ledger holding only the genesis block
    pub fn new(tunables: Tunables) -> Self {
        Self {
            chain: Chain::genesis(),
            extensions: ForkSet::new(),
            pending: Vec::new(),
            tunables,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn extensions(&self) -> &ForkSet {
        &self.extensions
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Enqueue a broadcast transaction at the back of the pool
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// The first `block_capacity` pending transactions, in FIFO order
    ///
    /// Does not remove them; removal happens only after a block built from
    /// them was admitted.
    pub fn select_mining_batch(&self) -> Vec<Transaction> {
        let take = self.tunables.block_capacity.min(self.pending.len());
        self.pending[..take].to_vec()
    }

    /// Remove the first `block_capacity` pending transactions
    pub fn drop_mined_front(&mut self) {
        let take = self.tunables.block_capacity.min(self.pending.len());
        self.pending.drain(..take);
    }

    /// Attempt to admit a block on top of the given parent
    ///
    /// If `base` is the canonical tip the block is appended to the canonical
    /// chain; otherwise it is filed into the fork set under the branch ending
    /// in `base`. Either way the link and the proof are validated first, and
    /// a failed validation mutates nothing.
    pub fn admit(&mut self, mut block: Block, proof: &str, base: &Block) -> Result<(), LedgerError> {
        let parent_hash = base.hash().unwrap_or("<unsealed>");
        if Some(block.previous_hash()) != base.hash() {
            return Err(LedgerError::InvalidLink {
                expected: parent_hash.to_string(),
                got: block.previous_hash().to_string(),
            });
        }
        if !pow::is_valid_proof(&block, proof, self.tunables.difficulty) {
            return Err(LedgerError::InvalidProof);
        }
        // is_valid_proof guarantees the computed hash equals `proof`
        block.seal(block.nonce());

        if base == self.chain.tip() {
            log::info!(
                "admitted block {} on canonical tip ({} txs)",
                block.height(),
                block.transactions().len()
            );
            self.chain.push(block);
        } else {
            log::info!(
                "filed block {} under fork base at height {}",
                block.height(),
                base.height()
            );
            self.extensions.file(base, block);
        }
        Ok(())
    }

    /// Local fork-choice: adopt the first extension that outgrows the tip
    ///
    /// The canonical suffix from the fork height onward is stored back into
    /// the fork set so it can win again later, then the winning branch
    /// becomes the canonical tail. At most one switch per call; repeated
    /// calls converge. The winning extension itself stays in the fork set.
    pub fn internal_consensus(&mut self) -> bool {
        let tip_height = self.chain.tip().height();
        let winner: Option<Vec<Block>> = self
            .extensions
            .iter()
            .find(|ext| ext.tip().height() > tip_height)
            .map(|ext| ext.blocks().to_vec());
        let Some(winner) = winner else {
            return false;
        };

        let fork_height = winner[0].height();
        log::info!(
            "internal consensus: switching to fork at height {} (new tip {})",
            fork_height,
            winner
                .last()
                .map(Block::height)
                .unwrap_or(fork_height)
        );
        let orphaned = self.chain.split_off_from(fork_height);
        self.extensions.adopt_orphaned(orphaned);
        self.chain.extend(winner);
        true
    }

    /// Reconcile the pending pool against a strictly longer peer chain
    ///
    /// Walks both chains backward at aligned heights to the most recent
    /// common block. Transactions confirmed only on our abandoned suffix
    /// return to the pool; transactions confirmed on the adopted suffix are
    /// removed from it.
    pub fn reconcile_pool(&mut self, other: &Chain) -> Result<(), LedgerError> {
        if self.chain.len() >= other.len() {
            return Err(LedgerError::ReconciliationPrecondition {
                local: self.chain.len(),
                remote: other.len(),
            });
        }

        // Canonical index equals height, so comparing at the same index
        // compares blocks at the same depth on both chains.
        let mut ancestor = self.chain.len() - 1;
        while ancestor > 0 && self.chain.get(ancestor) != other.get(ancestor) {
            ancestor -= 1;
        }

        for block in &self.chain.blocks()[ancestor + 1..] {
            self.pending.extend(block.transactions().iter().cloned());
        }
        for block in &other.blocks()[ancestor + 1..] {
            for tx in block.transactions() {
                if let Some(pos) = self.pending.iter().position(|p| p == tx) {
                    self.pending.remove(pos);
                }
            }
        }
        Ok(())
    }

    /// Adopt a strictly longer peer chain, reconciling the pool first
    pub fn adopt_chain(&mut self, other: &Chain) -> Result<(), LedgerError> {
        self.reconcile_pool(other)?;
        log::info!(
            "adopted consensus chain of length {} (was {})",
            other.len(),
            self.chain.len()
        );
        self.chain = other.clone();
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Tunables::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::pow::mine;

    /// Low difficulty so test mining is instant
    fn test_tunables() -> Tunables {
        Tunables {
            difficulty: 1,
            block_capacity: 3,
        }
    }

    fn mined_child(parent: &Block, txs: Vec<Transaction>, difficulty: usize) -> (Block, String) {
        let mut block = Block::new(
            parent.height() + 1,
            txs,
            parent.timestamp() + 1,
            parent.hash().unwrap(),
        );
        let proof = mine(&block, None, difficulty).expect("unbounded mining always succeeds");
        block.set_nonce(proof.nonce);
        (block, proof.hash)
    }

    fn txs(ids: &[&str]) -> Vec<Transaction> {
        ids.iter().map(|id| Transaction::new(*id)).collect()
    }

    #[test]
    fn test_fresh_ledger_has_genesis_only() {
        let ledger = Ledger::new(test_tunables());
        assert_eq!(ledger.chain().len(), 1);
        assert_eq!(ledger.chain().tip().height(), 0);
        assert_eq!(ledger.chain().tip().previous_hash(), "0");
        assert!(ledger.pending().is_empty());
        assert!(ledger.extensions().is_empty());
    }

    #[test]
    fn test_admit_extends_canonical_chain() {
        let mut ledger = Ledger::new(test_tunables());
        let base = ledger.chain().tip().clone();
        let (block, proof) = mined_child(&base, txs(&["a"]), 1);

        ledger.admit(block, &proof, &base).unwrap();

        assert_eq!(ledger.chain().len(), 2);
        assert!(ledger.chain().is_valid());
        assert!(ledger.extensions().is_empty());
    }

    #[test]
    fn test_admit_rejects_bad_link() {
        let mut ledger = Ledger::new(test_tunables());
        let base = ledger.chain().tip().clone();
        let mut block = Block::new(1, Vec::new(), 1, "wrong-parent-hash");
        let proof = mine(&block, None, 1).unwrap();
        block.set_nonce(proof.nonce);

        let err = ledger.admit(block, &proof.hash, &base).unwrap_err();

        assert!(matches!(err, LedgerError::InvalidLink { .. }));
        assert_eq!(ledger.chain().len(), 1);
        assert!(ledger.extensions().is_empty());
    }

    #[test]
    fn test_admit_rejects_bad_proof() {
        let mut ledger = Ledger::new(test_tunables());
        let base = ledger.chain().tip().clone();
        let (block, _) = mined_child(&base, Vec::new(), 1);

        // A hash with enough zeros that is not the block's own hash
        let forged = "0".repeat(64);
        let err = ledger.admit(block, &forged, &base).unwrap_err();

        assert_eq!(err, LedgerError::InvalidProof);
        assert_eq!(ledger.chain().len(), 1);
        assert!(ledger.extensions().is_empty());
    }

    #[test]
    fn test_admit_files_fork() {
        let mut ledger = Ledger::new(test_tunables());
        let genesis = ledger.chain().tip().clone();

        let (b1, p1) = mined_child(&genesis, txs(&["a"]), 1);
        ledger.admit(b1, &p1, &genesis).unwrap();

        // Competing block on the genesis, which is no longer the tip
        let (fork, pf) = mined_child(&genesis, txs(&["b"]), 1);
        ledger.admit(fork, &pf, &genesis).unwrap();

        assert_eq!(ledger.chain().len(), 2);
        assert_eq!(ledger.extensions().len(), 1);
    }

    #[test]
    fn test_internal_consensus_reorg() {
        let mut ledger = Ledger::new(test_tunables());
        let genesis = ledger.chain().tip().clone();

        // Canonical: genesis -> b1
        let (b1, p1) = mined_child(&genesis, txs(&["a"]), 1);
        ledger.admit(b1, &p1, &genesis).unwrap();

        // Fork: genesis -> f1 -> f2, longer than canonical
        let (f1, pf1) = mined_child(&genesis, txs(&["b"]), 1);
        ledger.admit(f1.clone(), &pf1, &genesis).unwrap();
        let mut f1_sealed = f1.clone();
        f1_sealed.seal(f1.nonce());
        let (f2, pf2) = mined_child(&f1_sealed, txs(&["c"]), 1);
        ledger.admit(f2, &pf2, &f1_sealed).unwrap();

        assert!(ledger.internal_consensus());

        assert_eq!(ledger.chain().len(), 3);
        assert!(ledger.chain().is_valid());
        // Genesis untouched below the fork point
        assert_eq!(ledger.chain().get(0), Some(&genesis));
        // The old canonical tail was filed back as an extension
        assert!(ledger
            .extensions()
            .iter()
            .any(|ext| ext.blocks().iter().any(|b| b.transactions() == txs(&["a"]))));
    }

    #[test]
    fn test_internal_consensus_idempotent_without_longer_fork() {
        let mut ledger = Ledger::new(test_tunables());
        let genesis = ledger.chain().tip().clone();
        let (b1, p1) = mined_child(&genesis, txs(&["a"]), 1);
        ledger.admit(b1, &p1, &genesis).unwrap();

        // An equal-length fork must not win
        let (f1, pf1) = mined_child(&genesis, txs(&["b"]), 1);
        ledger.admit(f1, &pf1, &genesis).unwrap();

        let before = ledger.clone();
        assert!(!ledger.internal_consensus());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_mining_batch_selection_and_removal() {
        let mut ledger = Ledger::new(test_tunables());
        for id in ["a", "b", "c", "d", "e"] {
            ledger.add_transaction(Transaction::new(id));
        }

        let batch = ledger.select_mining_batch();
        assert_eq!(batch, txs(&["a", "b", "c"]));
        // Selection does not remove
        assert_eq!(ledger.pending().len(), 5);

        ledger.drop_mined_front();
        assert_eq!(ledger.pending(), txs(&["d", "e"]).as_slice());
    }

    #[test]
    fn test_reconcile_requires_strictly_longer_chain() {
        let mut ledger = Ledger::new(test_tunables());
        let same_length = ledger.chain().clone();

        let err = ledger.reconcile_pool(&same_length).unwrap_err();
        assert_eq!(
            err,
            LedgerError::ReconciliationPrecondition {
                local: 1,
                remote: 1
            }
        );
    }

    #[test]
    fn test_reconcile_conserves_transactions() {
        let tunables = test_tunables();

        // Two ledgers diverge after genesis with disjoint transaction sets.
        let mut ours = Ledger::new(tunables);
        let mut theirs = Ledger::new(tunables);
        let genesis = ours.chain().tip().clone();

        let (our_block, our_proof) = mined_child(&genesis, txs(&["a", "b"]), 1);
        ours.admit(our_block, &our_proof, &genesis).unwrap();

        let (their_b1, their_p1) = mined_child(&genesis, txs(&["c", "d"]), 1);
        theirs.admit(their_b1, &their_p1, &genesis).unwrap();
        let their_tip = theirs.chain().tip().clone();
        let (their_b2, their_p2) = mined_child(&their_tip, txs(&["e"]), 1);
        theirs.admit(their_b2, &their_p2, &their_tip).unwrap();

        // Our pool still holds their transactions, not yet mined locally.
        for id in ["c", "d", "e", "f"] {
            ours.add_transaction(Transaction::new(id));
        }

        ours.adopt_chain(theirs.chain()).unwrap();

        // a, b return to the pool; c, d, e are confirmed elsewhere; f stays.
        assert_eq!(ours.pending(), txs(&["f", "a", "b"]).as_slice());
        assert_eq!(ours.chain(), theirs.chain());
    }
}
