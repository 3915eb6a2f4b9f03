//! Proof-of-work mining primitives

pub mod pow;

pub use pow::{is_valid_proof, mine, Proof};
