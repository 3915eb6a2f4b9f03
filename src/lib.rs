//! Ledger-Sim: a peer-to-peer proof-of-work ledger simulator
//!
//! This crate simulates a set of in-process mining peers, each holding a
//! local copy of a hash-linked block chain. Peers mine pending transactions
//! in bounded proof-of-work sprints, file competing blocks as fork
//! extensions, and converge through two fork-choice rules:
//! - internal consensus: adopt a locally-known longer branch
//! - external consensus: adopt a longer chain held by another peer,
//!   reconciling the pending-transaction pool across the switch
//!
//! There is no wallet or balance model and no real network transport; peers
//! communicate through an in-process broadcast abstraction.
//!
//! # Example
//!
//! ```rust
//! use ledger_sim::core::{Transaction, Tunables};
//! use ledger_sim::network::Network;
//! use std::time::Duration;
//!
//! let network = Network::new(Tunables { difficulty: 1, block_capacity: 3 });
//! let peer = network.join();
//!
//! network.broadcast(Transaction::new("Tx #0001"));
//! let mined = peer.mine_for(5, Duration::from_secs(5)).unwrap();
//!
//! assert!(mined >= 1);
//! assert_eq!(peer.chain_snapshot().len(), 2);
//! ```

pub mod core;
pub mod crypto;
pub mod mining;
pub mod network;
pub mod report;

// Re-export commonly used types
pub use crate::core::{
    Block, Chain, Extension, ForkSet, Ledger, LedgerError, Transaction, Tunables,
    DEFAULT_BLOCK_CAPACITY, DEFAULT_DIFFICULTY, DEFAULT_NUM_SPRINTS, DEFAULT_SPRINT_SECS,
};
pub use crate::mining::{is_valid_proof, mine, Proof};
pub use crate::network::{Client, Network, Peer};
