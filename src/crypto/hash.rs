//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 based hashing used for block content hashes and the
//! difficulty predicate applied to hex-encoded digests.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Checks if a hex-encoded hash has at least `digits` leading zero hex digits
///
/// This is the difficulty criterion for proof of work: difficulty counts
/// zero hex digits, not zero bits.
pub fn has_leading_zero_digits(hash_hex: &str, digits: usize) -> bool {
    hash_hex.len() >= digits && hash_hex.bytes().take(digits).all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let data = b"hello world";
        let hash = sha256(data);
        assert_eq!(hash.len(), 32);
        assert_eq!(
            sha256_hex(data),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_has_leading_zero_digits() {
        assert!(has_leading_zero_digits("000af3", 3));
        assert!(has_leading_zero_digits("000af3", 2));
        assert!(!has_leading_zero_digits("000af3", 4));
        // Zero difficulty accepts anything
        assert!(has_leading_zero_digits("deadbeef", 0));
        // Hash shorter than the requirement can never qualify
        assert!(!has_leading_zero_digits("00", 3));
    }
}
