//! Core ledger components
//!
//! The fundamental building blocks:
//! - Transactions (opaque identifiers, value equality)
//! - Blocks (sealed via canonical-serialization hashing)
//! - Chain (hash-linked sequence from genesis to tip)
//! - ForkSet (divergent branches rooted in the canonical chain)
//! - Ledger (admission, fork choice, pending pool, reconciliation)

pub mod block;
pub mod chain;
pub mod fork;
pub mod ledger;
pub mod transaction;

pub use block::Block;
pub use chain::Chain;
pub use fork::{Extension, ForkSet};
pub use ledger::{
    Ledger, LedgerError, Tunables, DEFAULT_BLOCK_CAPACITY, DEFAULT_DIFFICULTY, DEFAULT_NUM_SPRINTS,
    DEFAULT_SPRINT_SECS,
};
pub use transaction::Transaction;
