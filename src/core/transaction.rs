//! Transaction type for the ledger
//!
//! Transactions in this simulation are opaque identifiers: there is no
//! amount, signature or balance model. Two transactions are equal iff their
//! identifiers are equal, which is all the reconciliation algorithm needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    id: String,
}

impl Transaction {
    /// Create a transaction from its identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The transaction identifier
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for Transaction {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Transaction {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
