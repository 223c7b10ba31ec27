//! Shared fixtures for the integration test suites: deterministic signing
//! keys and a ready-to-use block oracle.

use k256::ecdsa::{hazmat::PrehashSigner, RecoveryId, Signature as K256Signature, SigningKey};
use orgchart_core::{BlockOracle, InMemoryBlockOracle};
use orgchart_primitives::{keccak256, Address, EcdsaSignature, B256};

/// Deterministic signer derived from a small seed byte, so tests stay
/// reproducible without pulling in an RNG.
pub fn signer(seed: u8) -> (SigningKey, Address) {
    let signing_key = SigningKey::from_bytes(&[seed; 32].into()).unwrap();
    let address = address_from_signing_key(&signing_key);
    (signing_key, address)
}

fn address_from_signing_key(key: &SigningKey) -> Address {
    let encoded = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_slice(&hash.as_slice()[12..])
}

/// Sign a prehashed digest the way an `eth_sign`-compatible wallet would,
/// producing the 65-byte `r || s || v` encoding [`orgchart_primitives`] expects.
pub fn sign(key: &SigningKey, digest: B256) -> EcdsaSignature {
    let (sig, recid): (K256Signature, RecoveryId) = key.sign_prehash_recoverable(digest.as_slice()).unwrap();
    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&sig.to_bytes());
    bytes[64] = recid.to_byte();
    EcdsaSignature::from_bytes(&bytes).unwrap()
}

pub fn oracle_at_height(blocks: u8) -> (InMemoryBlockOracle, B256) {
    let mut oracle = InMemoryBlockOracle::new(8);
    let mut last = B256::ZERO;
    for n in 0..blocks {
        last = keccak256(&[n]);
        oracle.push_block(last);
    }
    (oracle, last)
}

pub fn current_base_block(oracle: &InMemoryBlockOracle) -> B256 {
    oracle.block_hash(oracle.current_height() - 1).unwrap()
}
