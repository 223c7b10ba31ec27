//! Keccak-256 hashing
//!
//! Mirrors the platform's crypto crate convention of a thin wrapper over a
//! `Digest`-based hasher rather than reaching for a higher-level "just hash
//! this struct" helper — callers build up the exact byte layout they need,
//! then hash it once.

use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Hash a single byte slice with Keccak-256.
pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// Hash the concatenation of several byte slices with Keccak-256, without
/// materializing the concatenated buffer first.
pub fn keccak256_concat(chunks: &[&[u8]]) -> B256 {
    let mut hasher = Keccak256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    B256::from_slice(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_matches_known_vector() {
        // keccak256("") — a standard test vector, distinct from SHA3-256("").
        let got = keccak256(b"");
        let want =
            hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a47")
                .unwrap();
        assert_eq!(got.as_slice(), want.as_slice());
    }

    #[test]
    fn concat_matches_manual_concatenation() {
        let a = b"hello, ";
        let b = b"world";
        let mut combined = Vec::new();
        combined.extend_from_slice(a);
        combined.extend_from_slice(b);

        assert_eq!(keccak256_concat(&[a, b]), keccak256(&combined));
    }
}
