//! Proof-of-work search
//!
//! A bounded-time nonce search over a block's content hash. The search is
//! pure: it works on a local clone of the block, so the caller decides when
//! to apply a found proof. Every call restarts from nonce 0; the search is
//! deliberately non-resumable.

use crate::core::block::Block;
use crate::crypto::has_leading_zero_digits;
use std::time::{Duration, Instant};

/// A found proof of work
///
/// Carries both the winning nonce and the resulting hash, so a found proof
/// can never be confused with "no proof found" (`Option::None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub nonce: u64,
    pub hash: String,
}

/// Check that `hash` meets the difficulty and is the block's own content hash
pub fn is_valid_proof(block: &Block, hash: &str, difficulty: usize) -> bool {
    has_leading_zero_digits(hash, difficulty) && hash == block.compute_hash()
}

/// Search for a nonce whose hash meets the difficulty
///
/// Runs until a proof is found or the wall-clock budget is exhausted;
/// `None` budget means unbounded. The block itself is not modified.
pub fn mine(block: &Block, budget: Option<Duration>, difficulty: usize) -> Option<Proof> {
    let start = Instant::now();
    let mut trial = block.clone();
    let mut nonce = 0u64;

    loop {
        trial.set_nonce(nonce);
        let hash = trial.compute_hash();
        if has_leading_zero_digits(&hash, difficulty) {
            log::debug!(
                "proof found for block {} after {} attempts in {:?}",
                block.height(),
                nonce + 1,
                start.elapsed()
            );
            return Some(Proof { nonce, hash });
        }
        if let Some(budget) = budget {
            if start.elapsed() > budget {
                log::debug!(
                    "sprint for block {} exhausted after {} attempts",
                    block.height(),
                    nonce + 1
                );
                return None;
            }
        }
        nonce += 1;
    }
}
