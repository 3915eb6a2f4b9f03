//! Block implementation for the ledger
//!
//! A block records an ordered batch of transactions at a given height and
//! links to its parent through `previous_hash`. Its content hash is computed
//! over a canonical serialization so it is reproducible across peers, and is
//! absent until the block is sealed. Once sealed a block is immutable.

use crate::core::transaction::Transaction;
use crate::crypto::sha256_hex;
use serde::{Deserialize, Serialize};

/// A block in the hash-linked chain
///
/// Equality is structural and includes the hash, so a sealed and an unsealed
/// copy of the same content are not equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    height: u64,
    transactions: Vec<Transaction>,
    /// Creation time in milliseconds since the Unix epoch
    timestamp: i64,
    previous_hash: String,
    nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    hash: Option<String>,
}

impl Block {
    /// Create a new unsealed block
    pub fn new(
        height: u64,
        transactions: Vec<Transaction>,
        timestamp: i64,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self {
            height,
            transactions,
            timestamp,
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: None,
        }
    }

    /// Create the genesis block
    ///
    /// Fully deterministic (timestamp 0, nonce 0, parent hash "0"), so every
    /// ledger in the network starts from an identical block.
    pub fn genesis() -> Self {
        let mut block = Self::new(0, Vec::new(), 0, "0");
        block.seal(0);
        block
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The sealed content hash, or `None` if the block is still unsealed
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn is_sealed(&self) -> bool {
        self.hash.is_some()
    }

    /// Set the nonce of an unsealed block (used during proof-of-work search)
    pub fn set_nonce(&mut self, nonce: u64) {
        debug_assert!(!self.is_sealed(), "sealed blocks are immutable");
        self.nonce = nonce;
    }

    /// Compute the content hash of the block
    ///
    /// The hash covers every field except the hash itself, serialized as JSON
    /// with lexicographically sorted keys, then SHA-256 hex-encoded. Pure
    /// function of the block's fields.
    pub fn compute_hash(&self) -> String {
        // serde_json maps are BTreeMaps, so the key order is deterministic
        let payload = serde_json::json!({
            "height": self.height,
            "nonce": self.nonce,
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
        });
        sha256_hex(payload.to_string().as_bytes())
    }

    /// Seal the block: set the nonce and freeze the content hash
    pub fn seal(&mut self, nonce: u64) {
        debug_assert!(!self.is_sealed(), "sealed blocks are immutable");
        self.nonce = nonce;
        self.hash = Some(self.compute_hash());
    }
}
