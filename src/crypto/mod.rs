//! Cryptographic primitives used by the ledger

pub mod hash;

pub use hash::{has_leading_zero_digits, sha256, sha256_hex};
